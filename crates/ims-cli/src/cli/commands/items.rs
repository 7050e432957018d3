//! `ims items list|add|delete`.

use anyhow::Result;
use ims_core::config::ImsConfig;
use ims_core::dto::CreateItemDto;
use ims_core::services::inventory::ItemFilter;

use super::{print_notices, queries};

pub async fn run_items_list(
    cfg: &ImsConfig,
    search: Option<String>,
    category: Option<String>,
    low_stock: bool,
) -> Result<()> {
    let (queries, _) = queries(cfg)?;
    let filter = ItemFilter {
        search,
        category,
        low_stock: low_stock.then_some(true),
        ..Default::default()
    };
    let items = queries.items.list(filter).await?;
    if items.is_empty() {
        println!("No items.");
        return Ok(());
    }
    println!("{:<14} {:<30} {:>10} {:>10}", "SKU", "NAME", "ON HAND", "PRICE");
    for item in items {
        let flag = if item.needs_reorder() { " (reorder)" } else { "" };
        println!(
            "{:<14} {:<30} {:>10} {:>10.2}{flag}",
            item.sku, item.name, item.quantity_on_hand, item.selling_price
        );
    }
    Ok(())
}

pub async fn run_items_add(
    cfg: &ImsConfig,
    sku: String,
    name: String,
    price: f64,
    cost: f64,
    unit: String,
    sst_rate: u8,
) -> Result<()> {
    let (queries, notifier) = queries(cfg)?;
    let mut dto = CreateItemDto::new(sku, name, price);
    dto.cost_price = cost;
    dto.unit = unit;
    dto.sst_rate = sst_rate;

    let result = queries.items.create(dto).await;
    print_notices(&notifier);
    let item = result?;
    println!("Item id: {}", item.id);
    Ok(())
}

pub async fn run_items_delete(cfg: &ImsConfig, id: &str) -> Result<()> {
    let (queries, notifier) = queries(cfg)?;
    let result = queries.items.delete(id).await;
    print_notices(&notifier);
    Ok(result?)
}
