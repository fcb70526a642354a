use crate::output;
use crate::TravelerArgs;
use anyhow::{bail, Result};
use colored::Colorize;
use hostdesk_application::AppContext;
use hostdesk_core::model::{Traveler, TravelerFilters};
use hostdesk_core::session::Tab;

pub async fn list(ctx: &AppContext, args: TravelerArgs) -> Result<()> {
    super::enter(ctx, Tab::Travelers).await?;

    let filters = TravelerFilters {
        skill: args.skill,
        availability: args.availability,
        location: args.location,
    };
    let (travelers, notice) = ctx.fetch_travelers(filters).await?;
    output::print_notice(&notice);

    if travelers.is_empty() {
        println!("No travelers match these filters.");
        return Ok(());
    }
    for traveler in &travelers {
        print_traveler(traveler);
    }
    Ok(())
}

pub async fn send(
    ctx: &AppContext,
    traveler_id: &str,
    text: Option<String>,
    template: Option<String>,
) -> Result<()> {
    super::enter(ctx, Tab::Travelers).await?;

    ctx.compose_to(traveler_id).await;
    match (text, template) {
        (Some(text), _) => ctx.set_draft(&text).await,
        (None, Some(template_id)) => {
            ctx.apply_template(&template_id).await?;
        }
        (None, None) => bail!("Pass --text or --template."),
    }

    let notice = ctx.send_message().await?;
    output::print_notice(&notice);
    Ok(())
}

fn print_traveler(traveler: &Traveler) {
    let contacted = match &traveler.last_contacted {
        Some(date) => format!("contacted {}", date).dimmed().to_string(),
        None => String::new(),
    };
    println!(
        "{:>6}  {:<20} {:<16} {} {}",
        traveler.id.cyan(),
        traveler.name,
        traveler.availability,
        traveler.skills.join(", "),
        contacted
    );
}
