//! `X-Total-Count` and `Link` headers for paginated listings.

use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Uri};
use url::form_urlencoded;

use crate::database::Page;

pub const TOTAL_COUNT: &str = "x-total-count";

pub fn pagination_headers<T>(uri: &Uri, page: &Page<T>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(TOTAL_COUNT),
        HeaderValue::from(page.total_elements),
    );

    let links = link_header(uri, page.number, page.size, page.total_pages());
    match HeaderValue::from_str(&links) {
        Ok(value) => {
            headers.insert(header::LINK, value);
        }
        Err(e) => tracing::warn!("Unencodable Link header for {}: {}", uri, e),
    }
    headers
}

/// Links in the order next, prev, last, first. `last` is page 0 when
/// there are no records.
pub fn link_header(uri: &Uri, number: u32, size: u32, total_pages: u64) -> String {
    let number = u64::from(number);
    let last = total_pages.saturating_sub(1);

    let mut links = Vec::with_capacity(4);
    if number < last {
        links.push(page_link(uri, number + 1, size, "next"));
    }
    if number > 0 {
        links.push(page_link(uri, number - 1, size, "prev"));
    }
    links.push(page_link(uri, last, size, "last"));
    links.push(page_link(uri, 0, size, "first"));
    links.join(",")
}

fn page_link(uri: &Uri, page: u64, size: u32, rel: &str) -> String {
    format!("<{}>; rel=\"{}\"", page_url(uri, page, size), rel)
}

/// Request path and query with `page` and `size` replaced
fn page_url(uri: &Uri, page: u64, size: u32) -> String {
    let page = page.to_string();
    let size = size.to_string();
    let mut seen_page = false;
    let mut seen_size = false;

    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in form_urlencoded::parse(uri.query().unwrap_or("").as_bytes()) {
        match key.as_ref() {
            "page" if !seen_page => {
                seen_page = true;
                query.append_pair("page", &page);
            }
            "size" if !seen_size => {
                seen_size = true;
                query.append_pair("size", &size);
            }
            "page" | "size" => {}
            _ => {
                query.append_pair(&key, &value);
            }
        }
    }
    if !seen_page {
        query.append_pair("page", &page);
    }
    if !seen_size {
        query.append_pair("size", &size);
    }

    format!("{}?{}", uri.path(), query.finish())
}
