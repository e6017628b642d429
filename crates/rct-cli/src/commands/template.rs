use std::path::Path;

use anyhow::Context;
use rct_core::entities::NewTemplate;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TemplateCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `rct template`.
pub async fn handle(
    action: &TemplateCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        TemplateCommands::Import { file } => {
            let template = read_template(file).await?;
            let detail = ctx.service.create_template(&template).await?;
            tracing::info!(template_id = detail.template.id, name = %detail.template.name, "template imported");
            output(&detail, flags.format)
        }
        TemplateCommands::List => output(&ctx.service.list_templates().await?, flags.format),
    }
}

async fn read_template(path: &Path) -> anyhow::Result<NewTemplate> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid template JSON in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::read_template;

    #[tokio::test]
    async fn reads_nested_template_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("hads.json");
        std::fs::write(
            &path,
            r#"{
                "name": "HADS",
                "questions": [
                    { "text": "I feel tense", "order": 1,
                      "choices": [{ "text": "Never", "value": 0 }, { "text": "Often", "value": 2 }] }
                ]
            }"#,
        )
        .expect("write template");

        let template = read_template(&path).await.expect("template should parse");
        assert_eq!(template.name, "HADS");
        assert_eq!(template.description, "");
        assert_eq!(template.questions[0].choices.len(), 2);
    }

    #[tokio::test]
    async fn missing_file_names_the_path() {
        let err = read_template(std::path::Path::new("/nonexistent/hads.json"))
            .await
            .expect_err("should fail");
        assert!(format!("{err:#}").contains("/nonexistent/hads.json"));
    }
}
