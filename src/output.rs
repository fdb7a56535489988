use crate::error::CatalogError;
use crate::model::{Category, Product, SearchFilters};
use crate::paginate::PageInfo;
use crate::view::{ViewController, ViewState};
use serde::Serialize;

pub const FALLBACK_TITLE: &str = "Oops! Something went wrong.";

pub fn format_view(view: &ViewController) -> String {
    match view.state() {
        ViewState::Loading => "Loading...\n".to_string(),
        ViewState::Error(message) => format_error_screen(message),
        ViewState::Ready => match view.selected() {
            Some(product) => format_product_detail(product),
            None => {
                let info = view.page_info();
                let mut out = format_product_page(view.current_items(), &info, view.search_term());
                out.push_str(&format_page_hint(&info));
                out
            }
        },
    }
}

/// Navigation hint for the interactive view, empty when everything fits on
/// one page.
pub fn format_page_hint(info: &PageInfo) -> String {
    match (info.has_prev(), info.has_next()) {
        (true, true) => "\n_More results: `prev` or `next`_\n".to_string(),
        (true, false) => "\n_Last page: `prev` to go back_\n".to_string(),
        (false, true) => "\n_More results: `next`_\n".to_string(),
        (false, false) => String::new(),
    }
}

pub fn format_product_page(products: &[Product], info: &PageInfo, term: &str) -> String {
    let mut out = String::new();

    let heading = if term.is_empty() {
        "## Products".to_string()
    } else {
        format!("## Products matching \"{}\"", term)
    };

    if info.is_empty() {
        out.push_str(&format!(
            "{} (page {} of {}, no products on this page of {})\n",
            heading,
            info.page,
            info.total_pages,
            format_number(info.total_items as u64)
        ));
        return out;
    }

    out.push_str(&format!(
        "{} (page {} of {}, showing {}-{} of {})\n\n",
        heading,
        info.page,
        info.total_pages,
        info.first_item,
        info.last_item,
        format_number(info.total_items as u64)
    ));

    for (i, product) in products.iter().enumerate() {
        out.push_str(&format!("### {}. {}\n", info.first_item + i, product.title));
        out.push_str(&format!("- **Brand:** {}\n", product.brand));
        out.push_str(&format!("- **Price:** {}\n", format_price(product.price)));
        out.push_str(&format!(
            "- **Rating:** {:.1}/5 ({} reviews)\n",
            product.rating.rate,
            format_number(product.rating.count as u64)
        ));
        out.push_str(&format!("- **Stock:** {}\n", format_stock(product.stock)));
        out.push_str(&format!("- **Category:** {}\n", product.category));
        out.push_str(&format!("- **ID:** {}\n", product.id));

        if i < products.len() - 1 {
            out.push_str("\n---\n\n");
        }
    }

    out
}

pub fn format_product_detail(product: &Product) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", product.title));

    out.push_str("## Overview\n");
    out.push_str(&format!("- **Brand:** {}\n", product.brand));
    out.push_str(&format!("- **Price:** {}\n", format_price(product.price)));
    out.push_str(&format!(
        "- **Rating:** {:.1}/5 ({} reviews)\n",
        product.rating.rate,
        format_number(product.rating.count as u64)
    ));
    out.push_str(&format!("- **Availability:** {}\n", format_stock(product.stock)));
    out.push_str(&format!("- **Category:** {}\n", product.category));
    if !product.image.is_empty() {
        out.push_str(&format!("- **Image:** {}\n", product.image));
    }
    out.push('\n');

    if !product.description.is_empty() {
        out.push_str("## Description\n");
        out.push_str(&product.description);
        out.push_str("\n\n");
    }

    format_tags("Features", &product.features, &mut out);
    format_tags("Colors", &product.colors, &mut out);
    format_tags("Sizes", &product.sizes, &mut out);

    out
}

fn format_tags(title: &str, tags: &[String], out: &mut String) {
    if tags.is_empty() {
        return;
    }
    out.push_str(&format!("## {}\n", title));
    out.push_str(&tags.join(", "));
    out.push_str("\n\n");
}

pub fn format_categories(categories: &[Category]) -> String {
    let mut out = String::from("## Categories\n");
    if categories.is_empty() {
        out.push_str("No categories available.\n");
        return out;
    }
    for category in categories {
        out.push_str(&format!("{}. {}\n", category.id, category.name));
    }
    out
}

pub fn format_filters(term: &str, filters: &SearchFilters, page: usize) -> String {
    let mut out = String::from("## Filters\n");
    let any = |value: &str| {
        if value.is_empty() {
            "any".to_string()
        } else {
            value.to_string()
        }
    };

    if !term.is_empty() {
        out.push_str(&format!("- **Search:** {}\n", term));
    }
    out.push_str(&format!(
        "- **Price:** {} to {}\n",
        format_price(filters.min_price),
        format_price(filters.max_price)
    ));
    out.push_str(&format!("- **Category:** {}\n", any(&filters.category)));
    out.push_str(&format!("- **Brand:** {}\n", any(&filters.brand)));
    out.push_str(&format!("- **Color:** {}\n", any(&filters.color)));
    out.push_str(&format!("- **Size:** {}\n", any(&filters.size)));
    out.push_str(&format!("- **Page:** {}\n", page));
    out
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CatalogError> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn format_error_screen(message: &str) -> String {
    format!(
        "**Error:** {}\n\nChange the search or filters to try again, or type `retry`.\n",
        message
    )
}

pub fn format_fallback_screen() -> String {
    format!(
        "# {}\n\nWe're sorry for the inconvenience. Type `retry` to start over or `quit` to exit.\n",
        FALLBACK_TITLE
    )
}

fn format_stock(stock: u32) -> String {
    if stock == 0 {
        "Out of Stock".to_string()
    } else {
        format!("In Stock ({} left)", stock)
    }
}

pub fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}

fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}
