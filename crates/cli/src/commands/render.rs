//! Plain-text rendering for terminal output.

use catalog_admin_core::config::ApiConfig;
use catalog_admin_core::domain::image::Image;
use catalog_admin_core::domain::lookup::{Brand, Category};
use catalog_admin_core::domain::owner::Owner;
use catalog_admin_core::domain::product::Product;
use rust_decimal::{Decimal, RoundingStrategy};

const BAHT: char = '฿';

/// Thai-locale style: grouped thousands, at most three fraction digits,
/// no trailing zeros, baht sign appended.
pub fn format_price(price: Decimal) -> String {
    let rounded =
        price.round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero).normalize();
    let raw = rounded.abs().to_string();
    let (integer, fraction) = match raw.split_once('.') {
        Some((integer, fraction)) => (integer.to_string(), Some(fraction.to_string())),
        None => (raw.clone(), None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}{BAHT}"),
        None => format!("{sign}{grouped}{BAHT}"),
    }
}

pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|header| header.chars().count()).collect();
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(index) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header: Vec<String> = headers.iter().map(|header| header.to_string()).collect();
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    let mut lines = vec![line(&header), line(&rule)];
    for row in rows {
        lines.push(line(row));
    }
    lines.join("\n")
}

fn or_dash(value: Option<&str>) -> String {
    value.filter(|value| !value.is_empty()).unwrap_or("-").to_string()
}

pub fn products_table(products: &[Product], api: &ApiConfig) -> String {
    let rows: Vec<Vec<String>> = products
        .iter()
        .map(|product| {
            vec![
                product.id.to_string(),
                product.name.clone(),
                or_dash(product.brand_name()),
                or_dash(product.category_name()),
                format_price(product.unit_price),
                product.stock.to_string(),
                product
                    .primary_image()
                    .map(|image| api.asset_url(&image.file_path))
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    table(&["ID", "NAME", "BRAND", "CATEGORY", "PRICE", "STOCK", "IMAGE"], &rows)
}

pub fn product_detail(product: &Product, api: &ApiConfig) -> String {
    let mut lines = vec![
        format!("Product #{}", product.id),
        format!("  Name:        {}", product.name),
        format!("  Description: {}", product.description),
        format!("  Price:       {}", format_price(product.unit_price)),
        format!("  Stock:       {}", product.stock),
        format!(
            "  Brand:       {}",
            describe(product.brand_name(), product.brand_id.map(|id| id.0))
        ),
        format!(
            "  Category:    {}",
            describe(product.category_name(), product.category_id.map(|id| id.0))
        ),
    ];
    if product.images.is_empty() {
        lines.push("  Images:      none".to_string());
    } else {
        lines.push("  Images:".to_string());
        for image in &product.images {
            lines.push(format!("    #{} {}", image.id, api.asset_url(&image.file_path)));
        }
    }
    lines.join("\n")
}

fn describe(name: Option<&str>, id: Option<u64>) -> String {
    match (name, id) {
        (Some(name), Some(id)) if !name.is_empty() => format!("{name} (#{id})"),
        (_, Some(id)) => format!("#{id}"),
        _ => "-".to_string(),
    }
}

pub fn brands_table(brands: &[Brand]) -> String {
    let rows: Vec<Vec<String>> =
        brands.iter().map(|brand| vec![brand.id.to_string(), brand.name.clone()]).collect();
    table(&["ID", "BRAND"], &rows)
}

pub fn categories_table(categories: &[Category]) -> String {
    let rows: Vec<Vec<String>> = categories
        .iter()
        .map(|category| vec![category.id.to_string(), category.name.clone()])
        .collect();
    table(&["ID", "CATEGORY"], &rows)
}

pub fn owners_table(owners: &[Owner], api: &ApiConfig) -> String {
    let rows: Vec<Vec<String>> = owners
        .iter()
        .map(|owner| {
            vec![
                owner.id.to_string(),
                owner.display_name(),
                owner.email.clone(),
                owner
                    .profile_path
                    .as_deref()
                    .map(|path| api.asset_url(path))
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    table(&["ID", "NAME", "EMAIL", "PROFILE"], &rows)
}

pub fn images_table(images: &[Image], api: &ApiConfig) -> String {
    let rows: Vec<Vec<String>> = images
        .iter()
        .map(|image| {
            vec![
                image.id.to_string(),
                image.product_id.to_string(),
                api.asset_url(&image.file_path),
            ]
        })
        .collect();
    table(&["ID", "PRODUCT", "URL"], &rows)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{format_price, table};

    #[test]
    fn prices_group_thousands_and_drop_trailing_zeros() {
        assert_eq!(format_price(Decimal::new(259050, 2)), "2,590.5฿");
        assert_eq!(format_price(Decimal::new(1_000_000, 0)), "1,000,000฿");
        assert_eq!(format_price(Decimal::new(999, 0)), "999฿");
        assert_eq!(format_price(Decimal::ZERO), "0฿");
        assert_eq!(format_price(Decimal::new(12345678, 4)), "1,234.568฿");
    }

    #[test]
    fn prices_round_half_away_from_zero() {
        assert_eq!(format_price(Decimal::new(20005, 4)), "2.001฿");
        assert_eq!(format_price(Decimal::new(20025, 4)), "2.003฿");
        assert_eq!(format_price(Decimal::new(-20005, 4)), "-2.001฿");
        assert_eq!(format_price(Decimal::new(19995, 4)), "2฿");
    }

    #[test]
    fn table_pads_columns_to_widest_cell() {
        let rendered = table(
            &["ID", "NAME"],
            &[
                vec!["1".to_string(), "Apple".to_string()],
                vec!["10".to_string(), "Fig".to_string()],
            ],
        );
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "ID  NAME");
        assert_eq!(lines[1], "--  -----");
        assert_eq!(lines[2], "1   Apple");
        assert_eq!(lines[3], "10  Fig");
    }
}
