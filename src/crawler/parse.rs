use crate::crawler::extract::{clean_value, ExtractionRules};
use crate::domain::model::FoodRecord;
use scraper::{ElementRef, Html, Selector};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingItem {
    pub name: Option<String>,
    pub url: Url,
}

/// One page of a category listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListingPage {
    pub items: Vec<ListingItem>,
    pub next_page: Option<Url>,
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("Invalid selector")
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().replace('\u{a0}', " ").trim().to_string()
}

/// Food links from the results table plus the "Next" pagination link.
/// Relative links are resolved against `page_url`; unresolvable ones are
/// dropped.
pub fn parse_listing(html: &str, page_url: &Url) -> ListingPage {
    let document = Html::parse_document(html);
    let table_sel = selector("table.results");
    let row_sel = selector("tr");
    let cell_sel = selector("td");
    let link_sel = selector("a");

    let mut items = Vec::new();
    for table in document.select(&table_sel) {
        // 第一列是表頭
        for row in table.select(&row_sel).skip(1) {
            let Some(first_cell) = row.select(&cell_sel).next() else {
                continue;
            };
            let Some(link) = first_cell.select(&link_sel).next() else {
                continue;
            };
            let Some(href) = link.value().attr("href") else {
                continue;
            };
            match page_url.join(href) {
                Ok(url) => {
                    let name = element_text(&link);
                    items.push(ListingItem {
                        name: (!name.is_empty()).then_some(name),
                        url,
                    });
                }
                Err(e) => tracing::debug!("Skipping unresolvable link {}: {}", href, e),
            }
        }
    }

    let next_page = document
        .select(&link_sel)
        .find(|a| element_text(a) == "Next")
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| page_url.join(href).ok());

    ListingPage { items, next_page }
}

/// Builds a record from a food detail page. Fields whose row is missing or
/// whose value does not parse stay `None`.
pub fn parse_food_page(html: &str, food_name: Option<String>, rules: &ExtractionRules) -> FoodRecord {
    let document = Html::parse_document(html);
    let calories_sel = selector("td#calories");
    let row_sel = selector("tr");
    let cell_sel = selector("td");
    let value_sel = selector("td.right");

    let mut record = FoodRecord::named(food_name);
    record.calories = document
        .select(&calories_sel)
        .next()
        .and_then(|cell| clean_value(Some(element_text(&cell).as_str())));

    let rows: Vec<(String, Option<String>)> = document
        .select(&row_sel)
        .filter_map(|row| {
            let label = element_text(&row.select(&cell_sel).next()?);
            let value = row.select(&value_sel).next().map(|cell| element_text(&cell));
            Some((label, value))
        })
        .collect();

    for rule in rules.iter() {
        let value = rows
            .iter()
            .find(|(label, _)| rule.matches(label))
            .and_then(|(_, value)| clean_value(value.as_deref()));
        rule.field.assign(&mut record, value);
    }

    record
}
