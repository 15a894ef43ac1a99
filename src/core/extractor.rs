//! Pulls raw listing fields out of a listing page.
//!
//! The CSS paths below are the contract with the site's markup. When the
//! markup drifts, the extractor skips what it cannot find and says so in the
//! log instead of failing the run.

use crate::domain::model::RawFields;
use crate::utils::error::{EtlError, Result};
use scraper::{ElementRef, Html, Selector};

const CONTAINER: &str = "ul.c-item-list__list";
const ITEM: &str = "li.c-item";
const ITEM_CONTAINER: &str = "div.c-item__container";
const ITEM_CONTENT: &str = "div.c-item__content";
const DATA_WRAP: &str = "div.c-item__data-wrap";
const LINK: &str = "a.c-item__link";
const NAME: &str = "span.c-item__name";
const NAME_SUFFIX: &str = "span.c-item__name--suffix";
const DATA: &str = "div.c-item__data";
const PRICE: &str = "div.c-item__price";
const INFO: &str = "div.c-item__info";

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| EtlError::SelectorError {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

#[derive(Debug, Clone)]
struct ListingSelectors {
    container: Selector,
    item: Selector,
    item_container: Selector,
    item_content: Selector,
    data_wrap: Selector,
    link: Selector,
    name: Selector,
    name_suffix: Selector,
    data: Selector,
    price: Selector,
    info: Selector,
}

impl ListingSelectors {
    fn compile() -> Result<Self> {
        Ok(Self {
            container: compile(CONTAINER)?,
            item: compile(ITEM)?,
            item_container: compile(ITEM_CONTAINER)?,
            item_content: compile(ITEM_CONTENT)?,
            data_wrap: compile(DATA_WRAP)?,
            link: compile(LINK)?,
            name: compile(NAME)?,
            name_suffix: compile(NAME_SUFFIX)?,
            data: compile(DATA)?,
            price: compile(PRICE)?,
            info: compile(INFO)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ListingExtractor {
    selectors: ListingSelectors,
    max_items: usize,
    require_info: bool,
}

impl ListingExtractor {
    pub fn new(max_items: usize, require_info: bool) -> Result<Self> {
        Ok(Self {
            selectors: ListingSelectors::compile()?,
            max_items,
            require_info,
        })
    }

    /// Lazily yields the fields of the first `max_items` listing elements.
    ///
    /// A page without the listing container yields nothing (logged as a
    /// warning). An element with a missing node yields a
    /// [`EtlError::MissingFieldError`] and the caller moves on to the next.
    pub fn extract<'a>(
        &'a self,
        document: &'a Html,
        page: u32,
    ) -> impl Iterator<Item = Result<RawFields>> + 'a {
        let container = document.select(&self.selectors.container).next();
        if container.is_none() {
            tracing::warn!("⚠️ No listing container found on page {}", page);
        }

        container
            .into_iter()
            .flat_map(move |list| list.select(&self.selectors.item).take(self.max_items))
            .map(move |item| self.read_fields(item, page))
    }

    fn read_fields(&self, item: ElementRef<'_>, page: u32) -> Result<RawFields> {
        let s = &self.selectors;

        let container = first(item, &s.item_container, "container", page)?;
        let content = first(container, &s.item_content, "content", page)?;
        let data_wrap = first(content, &s.data_wrap, "data-wrap", page)?;

        let link = first(data_wrap, &s.link, "link", page)?;
        let name = first(link, &s.name, "name", page)?;
        let suffix = first(link, &s.name_suffix, "name suffix", page)?;
        let data = first(data_wrap, &s.data, "data", page)?;
        let price = first(data, &s.price, "price", page)?;

        let info = match data_wrap.select(&s.info).next() {
            Some(node) => Some(text_of(node)),
            None if self.require_info => {
                return Err(EtlError::MissingFieldError { page, field: "info" })
            }
            None => None,
        };

        Ok(RawFields {
            name: text_of(name),
            model: text_of(suffix),
            price: text_of(price),
            info,
        })
    }
}

fn first<'a>(
    scope: ElementRef<'a>,
    selector: &Selector,
    field: &'static str,
    page: u32,
) -> Result<ElementRef<'a>> {
    scope
        .select(selector)
        .next()
        .ok_or(EtlError::MissingFieldError { page, field })
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
