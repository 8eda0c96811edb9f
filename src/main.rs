use clap::Parser;
use food_insight::app::report::{render_goal, render_json, render_outcome};
use food_insight::config::{AnalyzeArgs, Command, ProfileArgs};
use food_insight::domain::model::UserProfile;
use food_insight::utils::error::{ErrorSeverity, InsightError};
use food_insight::utils::{logger, validation::Validate};
use food_insight::{calculate_protein_goal, init_global_models, AnalyzerCli, FoodAnalyzer};

fn exit_with(e: &InsightError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

fn checked_profile(args: &ProfileArgs) -> UserProfile {
    let profile = args.user_profile();
    if profile.activity.is_none() {
        tracing::warn!(
            "Unknown activity level '{}', using the default multiplier",
            args.activity
        );
        eprintln!(
            "⚠️ Unknown activity level '{}', protein goal uses the default multiplier",
            args.activity
        );
    }
    profile
}

fn run_goal(args: &ProfileArgs) {
    if let Err(e) = args.validate() {
        exit_with(&e);
    }
    let goal = calculate_protein_goal(&checked_profile(args));
    print!("{}", render_goal(&goal));
}

fn run_analyze(args: &AnalyzeArgs) {
    if let Err(e) = args.validate() {
        exit_with(&e);
    }

    // 模型缺失時直接拒絕分析
    let models = match init_global_models(&args.models.paths()) {
        Ok(models) => models,
        Err(e) => exit_with(&e),
    };

    let goal = calculate_protein_goal(&checked_profile(&args.profile));
    let analyzer = FoodAnalyzer::from_models(&models);

    let outcome = match analyzer.analyze(&args.submission(), &goal) {
        Ok(outcome) => outcome,
        Err(e) => exit_with(&e),
    };

    if args.json {
        match render_json(&outcome, &goal) {
            Ok(json) => println!("{}", json),
            Err(e) => exit_with(&InsightError::from(e)),
        }
        return;
    }

    print!("{}", render_goal(&goal));
    println!();
    print!("{}", render_outcome(&outcome));
}

fn main() {
    let cli = AnalyzerCli::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    match &cli.command {
        Command::Goal(args) => run_goal(args),
        Command::Analyze(args) => run_analyze(args),
    }
}
