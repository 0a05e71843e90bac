use serde_json::json;
use shelf_core::models::slugify;
use shelf_core::DocumentId;

use crate::cli::GlobalArgs;
use crate::commands::common::{
    connect, document_to_list_item, format_document_lines, format_timestamp,
    normalize_document_id, normalize_title, resolve_document_content, DocumentListItem,
};
use crate::config_profiles::normalize_text_option;
use crate::error::CliError;

pub async fn run_whoami(global: &GlobalArgs) -> Result<(), CliError> {
    let controller = connect(global).await?;
    let user = controller.current_user().await?;
    println!("{} <{}>", user.display_name(), user.email);
    Ok(())
}

pub async fn run_list(global: &GlobalArgs, as_json: bool) -> Result<(), CliError> {
    let mut controller = connect(global).await?;
    controller.refresh_documents().await?;
    let documents = &controller.state().document_list;

    if as_json {
        let items = documents
            .iter()
            .map(document_to_list_item)
            .collect::<Vec<DocumentListItem>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else if documents.is_empty() {
        println!("No documents.");
    } else {
        for line in format_document_lines(documents) {
            println!("{line}");
        }
    }

    Ok(())
}

pub async fn run_get(global: &GlobalArgs, id: &str, as_json: bool) -> Result<(), CliError> {
    let id = DocumentId::new(normalize_document_id(id)?);
    let mut controller = connect(global).await?;
    controller.open_document(&id).await?;
    let document = &controller.state().current_document;

    if as_json {
        println!("{}", serde_json::to_string_pretty(document)?);
        return Ok(());
    }

    println!("# {}", document.title);
    println!("path: {}", document.path);
    if let Some(updated_at) = document.updated_at {
        println!("updated: {}", format_timestamp(updated_at));
    }
    println!();
    println!("{}", document.content);
    Ok(())
}

pub async fn run_submit(
    global: &GlobalArgs,
    title: &str,
    path: Option<String>,
    content: Option<String>,
    retry: bool,
    as_json: bool,
) -> Result<(), CliError> {
    let title = normalize_title(title)?;
    let content = resolve_document_content(content)?;
    let mut controller = connect(global).await?;

    // An explicit path has to land first so the title does not derive one.
    if let Some(path) = normalize_text_option(path) {
        controller.edit(|state| state.set_path(path));
    }
    controller.edit(|state| state.set_title(title).set_content(content));

    let id = if retry {
        controller.submit_current_document_with_retry().await?
    } else {
        controller.submit_current_document().await?
    };

    let document = &controller.state().current_document;
    if as_json {
        let payload = json!({
            "id": id,
            "title": document.title,
            "path": document.path,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("Saved document {id} ({})", document.path);
    }
    Ok(())
}

pub async fn run_delete(global: &GlobalArgs, id: &str) -> Result<(), CliError> {
    let id = DocumentId::new(normalize_document_id(id)?);
    let mut controller = connect(global).await?;
    controller.delete_document(&id).await?;
    println!("Deleted document {id}");
    Ok(())
}

pub fn run_slug(title_parts: &[String]) {
    println!("{}", slugify(&title_parts.join(" ")));
}
