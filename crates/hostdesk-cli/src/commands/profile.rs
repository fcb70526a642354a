use crate::output;
use crate::ProfileArgs;
use anyhow::{bail, Result};
use hostdesk_application::AppContext;
use hostdesk_core::model::{HostProfile, ProfilePatch};
use hostdesk_core::session::Tab;

pub async fn show(ctx: &AppContext) -> Result<()> {
    super::enter(ctx, Tab::Profile).await?;
    let profile = ctx.profile().await?;
    print_profile(&profile);
    Ok(())
}

pub async fn set(ctx: &AppContext, args: ProfileArgs) -> Result<()> {
    super::enter(ctx, Tab::Profile).await?;

    let patch = ProfilePatch {
        description: args.description,
        location: args.location,
        accommodation: args.accommodation,
        languages: args.languages,
        help_types: (!args.help_types.is_empty()).then_some(args.help_types),
    };
    if patch.is_empty() {
        bail!("Nothing to update. Pass at least one field, e.g. --location.");
    }

    // Rendered, so the saved profile is refetched before we print it.
    let _view = ctx.open_view(Tab::Profile).await?;
    let (saved, notice) = ctx.save_profile(&patch).await?;
    output::print_notice(&notice);
    print_profile(&saved);
    Ok(())
}

fn print_profile(profile: &HostProfile) {
    output::heading("Host profile");
    output::field("Description", &profile.description);
    output::field("Location", &profile.location);
    output::field("Accommodation", &profile.accommodation);
    output::field("Languages", &profile.languages);
    output::field("Help wanted", &profile.help_types.join(", "));
}
