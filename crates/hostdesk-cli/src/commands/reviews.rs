use crate::output;
use anyhow::{bail, Result};
use colored::Colorize;
use hostdesk_application::{AppContext, RenderState};
use hostdesk_core::model::{Review, ReviewSummary};
use hostdesk_core::ResourceKey;
use hostdesk_core::session::Tab;

pub async fn list(ctx: &AppContext) -> Result<()> {
    super::enter(ctx, Tab::Reviews).await?;
    let view = ctx.open_view(Tab::Reviews).await?;

    let reviews: Vec<Review> = match view.current() {
        RenderState::Failed(err) => return Err(err.into()),
        RenderState::Loading => bail!("Reviews are still loading."),
        RenderState::Empty => {
            println!("No reviews yet.");
            return Ok(());
        }
        RenderState::Ready => view.decode(ResourceKey::Reviews)?,
    };
    let summary = ReviewSummary::from_reviews(&reviews);
    output::heading("Reviews");
    match summary.average {
        Some(average) => println!("  {} reviews, average {:.1}/5", summary.count, average),
        None => println!("  {} reviews", summary.count),
    }
    for review in &reviews {
        let stars = "★".repeat(usize::from(review.rating.min(5)));
        println!(
            "\n  {} {} ({})",
            stars.yellow(),
            review.traveler_name.bold(),
            review.date
        );
        if !review.comment.is_empty() {
            println!("  {}", review.comment);
        }
    }
    Ok(())
}
