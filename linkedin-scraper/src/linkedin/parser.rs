use scraper::{ElementRef, Html, Selector};

use crate::linkedin::types::{Job, SearchResults};

fn strip_text(text: &str) -> String {
    text.trim().replace('\n', "")
}

fn first_text(listing: ElementRef, selector: &Selector) -> String {
    listing
        .select(selector)
        .next()
        .map(|el| strip_text(&el.text().collect::<String>()))
        .unwrap_or_default()
}

fn first_attr(listing: ElementRef, selector: &Selector, attr: &str) -> Option<String> {
    listing
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(String::from)
}

/// Drops the tracking query string LinkedIn appends to every link.
fn strip_tracking(href: &str) -> String {
    let canonical = href.split('?').next().unwrap_or(href);
    strip_text(canonical)
}

fn parse_count(raw: &str) -> Option<u32> {
    raw.trim().replace(',', "").replace('+', "").parse().ok()
}

/// Extracts all job listings and the total-result count from a search
/// results page. Pure: no I/O, same markup in, same records out. Each
/// field is selected independently, so a listing missing e.g. its salary
/// still yields a record with the remaining fields filled in. A listing
/// without a job link is skipped.
pub fn parse_jobs(html: &str) -> SearchResults {
    let doc = Html::parse_document(html);

    let count_selector = Selector::parse("span[class*='job-count']").unwrap();
    let total = doc
        .select(&count_selector)
        .next()
        .and_then(|el| parse_count(&el.text().collect::<String>()));

    let listing_selector = Selector::parse("section[class*='results-list'] > ul > li").unwrap();
    let job_link_selector = Selector::parse("div > a").unwrap();
    let title_selector = Selector::parse("div > a > span").unwrap();
    let company_selector = Selector::parse("div div[class*='info'] > h4 > a").unwrap();
    let address_selector = Selector::parse("div div[class*='info'] > div > span").unwrap();
    let time_selector = Selector::parse("div div[class*='info'] > div > time").unwrap();
    let salary_selector = Selector::parse("span[class*='salary']").unwrap();

    let mut jobs = Vec::new();
    for listing in doc.select(&listing_selector) {
        let href = match first_attr(listing, &job_link_selector, "href") {
            Some(href) => href,
            None => {
                log::warn!("Listing without a job link, skipping");
                continue;
            }
        };
        jobs.push(Job {
            title: first_text(listing, &title_selector),
            company: first_text(listing, &company_selector),
            address: first_text(listing, &address_selector),
            time_added: first_attr(listing, &time_selector, "datetime")
                .map(|dt| strip_text(&dt)),
            joburl: strip_tracking(&href),
            company_url: first_attr(listing, &company_selector, "href")
                .map(|href| strip_tracking(&href))
                .unwrap_or_default(),
            salary: first_text(listing, &salary_selector),
        });
    }
    SearchResults { jobs, total }
}
