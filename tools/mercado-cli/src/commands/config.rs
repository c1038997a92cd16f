//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};
use mercado_commerce::Currency;

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::Context;

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Get { key } => get_config(&key, ctx),
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let market = &ctx.config.market;
    ctx.output.info("[store]");
    ctx.output.kv("path", &ctx.config.store.path);
    ctx.output.kv("resolved", &ctx.store_path().display().to_string());

    ctx.output.info("[market]");
    ctx.output.kv("currency", market.currency.code());
    ctx.output.kv("shipping_cost", &market.shipping_cost().display());
    ctx.output.kv("default_country", &market.default_country);
    ctx.output.kv("order_number_length", &market.order_number_length.to_string());
    ctx.output.kv("order_number_attempts", &market.order_number_attempts.to_string());

    ctx.output.info("[log]");
    ctx.output.kv("level", &ctx.config.log.level);

    Ok(())
}

fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let Some(config_path) = &ctx.config_path else {
        bail!("No config file found. Run `mercado config init` to create one.");
    };

    let mut config = CliConfig::load(config_path)?;
    set_config_value(&mut config, key, value)?;
    config.market.validate()?;
    config.save(config_path)?;

    ctx.output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("mercado.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let mut warnings: Vec<String> = Vec::new();

    if let Err(e) = ctx.config.market.validate() {
        bail!("Configuration is invalid: {}", e);
    }

    if ctx.config.store.path.trim().is_empty() {
        bail!("Configuration is invalid: store.path must not be empty");
    }

    if ctx.config_path.is_none() {
        warnings.push("no config file found; using defaults".to_string());
    }

    let store = ctx.store_path();
    if store.exists() {
        if let Err(e) = ctx.market() {
            bail!("Store cannot be read: {:#}", e);
        }
    } else {
        warnings.push(format!(
            "store {} does not exist yet; it is created on first write",
            store.display()
        ));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if warnings.is_empty() {
        ctx.output.success("Configuration is valid");
    } else {
        ctx.output.success("Configuration is valid (with warnings)");
    }

    Ok(())
}

fn get_config_value(config: &CliConfig, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["store", "path"] => Ok(config.store.path.clone()),
        ["market", "currency"] => Ok(config.market.currency.code().to_string()),
        ["market", "shipping_cost_cents"] => Ok(config.market.shipping_cost_cents.to_string()),
        ["market", "default_country"] => Ok(config.market.default_country.clone()),
        ["market", "order_number_length"] => Ok(config.market.order_number_length.to_string()),
        ["market", "order_number_attempts"] => Ok(config.market.order_number_attempts.to_string()),
        ["log", "level"] => Ok(config.log.level.clone()),
        _ => bail!("Unknown config key: {}", key),
    }
}

fn set_config_value(config: &mut CliConfig, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["store", "path"] => config.store.path = value.to_string(),
        ["market", "currency"] => {
            config.market.currency = match Currency::from_code(value) {
                Some(currency) => currency,
                None => bail!("Unknown currency: {}", value),
            }
        }
        ["market", "shipping_cost_cents"] => config.market.shipping_cost_cents = value.parse()?,
        ["market", "default_country"] => config.market.default_country = value.to_string(),
        ["market", "order_number_length"] => config.market.order_number_length = value.parse()?,
        ["market", "order_number_attempts"] => config.market.order_number_attempts = value.parse()?,
        ["log", "level"] => config.log.level = value.to_string(),
        _ => bail!("Unknown or read-only config key: {}", key),
    }

    Ok(())
}
