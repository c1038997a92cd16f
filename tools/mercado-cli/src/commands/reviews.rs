//! Review commands.

use anyhow::Result;

use super::users::{print_review, usernames};
use super::{ReviewsArgs, ReviewsCommand};
use crate::context::Context;

/// Run the reviews command.
pub fn run(args: ReviewsArgs, ctx: &Context) -> Result<()> {
    let market = ctx.market()?;

    match args.command {
        ReviewsCommand::Submit {
            username,
            rating,
            comment,
        } => {
            let author = ctx.actor(&market)?;
            let recipient = market.user_by_username(&username)?;
            let outcome = market.submit_review(&author, &recipient.id, rating, &comment)?;
            if ctx.output.is_json() {
                ctx.output.json(&outcome);
            } else if outcome.created {
                ctx.output
                    .success(&format!("Rated {} {}", username, outcome.review.rating.stars()));
            } else {
                ctx.output.success(&format!(
                    "Updated your rating of {} to {}",
                    username,
                    outcome.review.rating.stars()
                ));
            }
        }
        ReviewsCommand::Candidates => {
            let user = ctx.actor(&market)?;
            let candidates = market.review_candidates(&user)?;
            if ctx.output.is_json() {
                ctx.output.json(&candidates);
                return Ok(());
            }
            ctx.output.header("People you have traded with");
            if candidates.is_empty() {
                ctx.output.info("No delivered orders yet");
            }
            for candidate in &candidates {
                let mark = if candidate.has_review { "reviewed" } else { "not reviewed" };
                ctx.output
                    .list_item(&format!("{} ({})", candidate.counterparty.username, mark));
            }
        }
        ReviewsCommand::For { username } => {
            let user = market.user_by_username(&username)?;
            let rep = market.reputation(&user.id)?;
            if ctx.output.is_json() {
                ctx.output.json(&rep);
                return Ok(());
            }
            ctx.output.header(&format!(
                "{}: {:.1} from {} review(s)",
                username, rep.average, rep.total
            ));
            let names = usernames(&market)?;
            for review in &rep.reviews {
                print_review(review, &names, ctx);
            }
        }
    }

    Ok(())
}
