//! Catalog commands: categories, products, browsing.

use anyhow::Result;
use mercado_commerce::catalog::{Product, ProductDraft};
use mercado_commerce::search::{ProductQuery, SortOption, RELATED_LIMIT};
use mercado_commerce::{CategoryId, ProductId};

use super::{parse_price, CatalogArgs, CatalogCommand};
use crate::context::Context;
use crate::output::{format_timestamp, truncate};

/// Run the catalog command.
pub fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    let market = ctx.market()?;
    let currency = market.config().currency;

    match args.command {
        CatalogCommand::AddCategory {
            name,
            description,
            parent,
        } => {
            let parent = parent.map(CategoryId::new);
            let category = market.create_category(&name, &description, parent.as_ref())?;
            if ctx.output.is_json() {
                ctx.output.json(&category);
            } else {
                ctx.output
                    .success(&format!("Created category {} ({})", category.name, category.id));
            }
        }
        CatalogCommand::Categories => {
            let tree = market.category_tree()?;
            if ctx.output.is_json() {
                ctx.output.json(&tree);
                return Ok(());
            }
            ctx.output.header("Categories");
            for (root, children) in &tree {
                ctx.output.list_item(&format!("{} ({})", root.name, root.id));
                for child in children {
                    ctx.output.kv(&format!("  {}", child.name), child.id.as_str());
                }
            }
        }
        CatalogCommand::AddProduct {
            name,
            category,
            price,
            stock,
            brand,
            description,
            discount,
            image,
        } => {
            let actor = ctx.actor(&market)?;
            let draft = ProductDraft {
                name,
                category_id: CategoryId::new(category),
                description,
                brand,
                price: parse_price(&price, currency)?,
                stock,
                discount_percent: discount,
                image,
            };
            let product = market.create_product(&actor, draft)?;
            if ctx.output.is_json() {
                ctx.output.json(&product);
            } else {
                ctx.output
                    .success(&format!("Listed {} ({})", product.name, product.id));
            }
        }
        CatalogCommand::EditProduct {
            id,
            name,
            category,
            price,
            stock,
            brand,
            description,
            discount,
            image,
        } => {
            let actor = ctx.actor(&market)?;
            let id = ProductId::new(id);
            let current = market.product(&id)?;
            let draft = ProductDraft {
                name: name.unwrap_or(current.name),
                category_id: category.map(CategoryId::new).unwrap_or(current.category_id),
                description: description.unwrap_or(current.description),
                brand: brand.unwrap_or(current.brand),
                price: match price {
                    Some(p) => parse_price(&p, currency)?,
                    None => current.price,
                },
                stock: stock.unwrap_or(current.stock),
                discount_percent: Some(discount.unwrap_or(current.discount_percent)),
                image,
            };
            let product = market.update_product(&actor, &id, draft)?;
            if ctx.output.is_json() {
                ctx.output.json(&product);
            } else {
                ctx.output.success(&format!("Updated {}", product.name));
            }
        }
        CatalogCommand::Restock { id, quantity } => {
            let actor = ctx.actor(&market)?;
            let product = market.restock(&actor, &ProductId::new(id), quantity)?;
            if ctx.output.is_json() {
                ctx.output.json(&product);
            } else {
                ctx.output.success(&format!(
                    "{} now has {} unit(s) in stock",
                    product.name, product.stock
                ));
            }
        }
        CatalogCommand::List {
            query,
            category,
            min_price,
            max_price,
            brand,
            all,
            sort,
            page,
            per_page,
        } => {
            let min = min_price.map(|p| parse_price(&p, currency)).transpose()?;
            let max = max_price.map(|p| parse_price(&p, currency)).transpose()?;

            let mut q = ProductQuery::new()
                .with_sort(SortOption::from_key(&sort))
                .with_price_range(min, max)
                .with_pagination(page, per_page);
            if all {
                q = q.include_out_of_stock();
            }
            if let Some(text) = query {
                q = q.with_text(text);
            }
            if let Some(category) = category {
                q = q.with_category(CategoryId::new(category));
            }
            if let Some(brand) = brand {
                q = q.with_brand(brand);
            }

            let results = market.list_products(&q)?;
            if ctx.output.is_json() {
                ctx.output.json(&results);
                return Ok(());
            }

            let p = &results.pagination;
            ctx.output.header(&format!(
                "Products {}-{} of {} ({})",
                p.start_item(),
                p.end_item(),
                p.total,
                q.sort.display_name()
            ));
            print_products(&results.items, ctx);
            if p.has_next {
                ctx.output
                    .info(&format!("More on page {} of {}", p.page + 1, p.total_pages));
            }
        }
        CatalogCommand::Show { id } => {
            let id = ProductId::new(id);
            let product = market.product(&id)?;
            let related = market.related_products(&id, RELATED_LIMIT)?;

            if ctx.output.is_json() {
                ctx.output.json(&serde_json::json!({
                    "product": product,
                    "related": related,
                }));
                return Ok(());
            }

            ctx.output.header(&product.name);
            ctx.output.kv("id", product.id.as_str());
            ctx.output.kv("brand", &product.brand);
            ctx.output.kv("price", &price_label(&product));
            ctx.output.kv("stock", &product.stock.to_string());
            if !product.description.is_empty() {
                ctx.output.kv("description", &product.description);
            }
            ctx.output.kv("listed", &format_timestamp(product.created_at));

            if !related.is_empty() {
                ctx.output.header("Related");
                print_products(&related, ctx);
            }
        }
        CatalogCommand::BestSellers { limit } => {
            let products = market.best_sellers(limit)?;
            if ctx.output.is_json() {
                ctx.output.json(&products);
            } else {
                ctx.output.header("Best sellers");
                print_products(&products, ctx);
            }
        }
        CatalogCommand::OnSale { limit } => {
            let products = market.on_sale(limit)?;
            if ctx.output.is_json() {
                ctx.output.json(&products);
            } else {
                ctx.output.header("On sale");
                print_products(&products, ctx);
            }
        }
        CatalogCommand::History { id } => {
            let history = market.stock_history(&ProductId::new(id))?;
            if ctx.output.is_json() {
                ctx.output.json(&history);
                return Ok(());
            }
            ctx.output.header("Stock history");
            let widths = [18, 8, 14, 20];
            ctx.output
                .table_row(&["WHEN", "CHANGE", "REASON", "ORDER"], &widths);
            for adjustment in &history {
                ctx.output.table_row(
                    &[
                        &format_timestamp(adjustment.timestamp),
                        &format!("{:+}", adjustment.quantity_change),
                        adjustment.reason.as_str(),
                        adjustment.order_id.as_ref().map_or("", |id| id.as_str()),
                    ],
                    &widths,
                );
            }
        }
    }

    Ok(())
}

fn price_label(product: &Product) -> String {
    if product.on_sale {
        format!(
            "{} (was {}, -{}%)",
            product.effective_price().display(),
            product.price.display(),
            product.discount_percent
        )
    } else {
        product.price.display()
    }
}

fn print_products(products: &[Product], ctx: &Context) {
    if products.is_empty() {
        ctx.output.info("No products found");
        return;
    }
    let widths = [22, 28, 26, 6];
    ctx.output.table_row(&["ID", "NAME", "PRICE", "STOCK"], &widths);
    for product in products {
        ctx.output.table_row(
            &[
                product.id.as_str(),
                &truncate(&product.name, 28),
                &price_label(product),
                &product.stock.to_string(),
            ],
            &widths,
        );
    }
}
