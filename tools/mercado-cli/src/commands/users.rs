//! Account commands.

use std::collections::HashMap;

use anyhow::Result;
use mercado_commerce::accounts::{ProfileUpdate, SignupForm};
use mercado_commerce::reviews::Review;
use mercado_commerce::{Marketplace, UserId};

use super::{UsersArgs, UsersCommand};
use crate::context::Context;
use crate::output::{format_timestamp, truncate};

/// Run the users command.
pub fn run(args: UsersArgs, ctx: &Context) -> Result<()> {
    let market = ctx.market()?;

    match args.command {
        UsersCommand::Register {
            username,
            email,
            first_name,
            last_name,
        } => {
            let user = market.register(SignupForm {
                username,
                email,
                first_name,
                last_name,
            })?;
            if ctx.output.is_json() {
                ctx.output.json(&user);
            } else {
                ctx.output
                    .success(&format!("Registered {} ({})", user.username, user.id));
            }
            Ok(())
        }
        UsersCommand::Show { username } => show_profile(&market, &username, ctx),
        UsersCommand::Edit {
            first_name,
            last_name,
            email,
            bio,
            phone,
            address,
            picture,
        } => {
            let actor = ctx.actor(&market)?;
            let user = market.update_profile(
                &actor,
                ProfileUpdate {
                    first_name,
                    last_name,
                    email,
                    bio,
                    phone,
                    address,
                    picture,
                },
            )?;
            if ctx.output.is_json() {
                ctx.output.json(&user);
            } else {
                ctx.output.success(&format!("Updated profile of {}", user.username));
            }
            Ok(())
        }
        UsersCommand::List => {
            let users = market.users()?;
            if ctx.output.is_json() {
                ctx.output.json(&users);
                return Ok(());
            }
            ctx.output.header(&format!("Users ({})", users.len()));
            let widths = [16, 24, 28];
            ctx.output.table_row(&["USERNAME", "NAME", "EMAIL"], &widths);
            for user in &users {
                ctx.output.table_row(
                    &[&user.username, &truncate(&user.display_name(), 24), &user.email],
                    &widths,
                );
            }
            Ok(())
        }
    }
}

fn show_profile(market: &Marketplace, username: &str, ctx: &Context) -> Result<()> {
    let viewer = ctx.viewer(market)?;
    let view = market.profile_view(viewer.as_ref(), username)?;

    if ctx.output.is_json() {
        ctx.output.json(&view);
        return Ok(());
    }

    let user = &view.user;
    ctx.output.header(&user.display_name());
    ctx.output.kv("username", &user.username);
    ctx.output.kv("email", &user.email);
    if !user.profile.bio.is_empty() {
        ctx.output.kv("bio", &user.profile.bio);
    }
    if !user.profile.phone.is_empty() {
        ctx.output.kv("phone", &user.profile.phone);
    }
    if !user.profile.address.is_empty() {
        ctx.output.kv("address", &user.profile.address);
    }
    ctx.output.kv("member since", &format_timestamp(user.created_at));

    let rep = &view.reputation;
    ctx.output.kv(
        "reputation",
        &format!("{:.1} from {} review(s)", rep.average, rep.total),
    );
    let names = usernames(market)?;
    for review in &rep.reviews {
        print_review(review, &names, ctx);
    }

    if view.can_review {
        match &view.own_review {
            Some(own) => ctx.output.info(&format!(
                "You rated {} {}. Submit again to change it.",
                user.username, own.rating
            )),
            None => ctx.output.info(&format!("You can review {}.", user.username)),
        }
    }

    Ok(())
}

/// Usernames by ID, for printing reviews and orders.
pub(crate) fn usernames(market: &Marketplace) -> Result<HashMap<UserId, String>> {
    Ok(market
        .users()?
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect())
}

pub(crate) fn print_review(review: &Review, names: &HashMap<UserId, String>, ctx: &Context) {
    let author = names
        .get(&review.author)
        .cloned()
        .unwrap_or_else(|| review.author.to_string());
    let edited = if review.is_edited() { " (edited)" } else { "" };
    ctx.output.list_item(&format!(
        "{} {} {}{}",
        review.rating.stars(),
        author,
        format_timestamp(review.updated_at),
        edited
    ));
    if !review.comment.is_empty() {
        ctx.output.kv("  ", &review.comment);
    }
}
