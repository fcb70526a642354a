use crate::output;
use anyhow::{bail, Result};
use colored::Colorize;
use hostdesk_application::{AppContext, Notice, RenderState};
use hostdesk_core::model::MessageTemplate;
use hostdesk_core::session::Tab;
use hostdesk_core::ResourceKey;

pub async fn list(ctx: &AppContext) -> Result<()> {
    super::enter(ctx, Tab::Templates).await?;
    let view = ctx.open_view(Tab::Templates).await?;

    match view.current() {
        RenderState::Failed(err) => return Err(err.into()),
        RenderState::Loading => bail!("Templates are still loading."),
        RenderState::Empty => println!("No saved templates yet."),
        RenderState::Ready => {
            let templates: Vec<MessageTemplate> = view.decode(ResourceKey::Templates)?;
            output::heading("Message templates");
            for template in &templates {
                print_template(template);
            }
        }
    }
    Ok(())
}

pub async fn save(ctx: &AppContext, name: &str, content: &str) -> Result<()> {
    super::enter(ctx, Tab::Templates).await?;
    let created = ctx.save_template(name, content).await?;
    output::print_notice(&Notice::info(
        "Template Saved",
        format!("'{}' is ready to use.", created.name),
    ));
    print_template(&created);
    Ok(())
}

fn print_template(template: &MessageTemplate) {
    println!("{:>6}  {}", template.id.cyan(), template.name.bold());
    println!("        {}", template.content);
}
