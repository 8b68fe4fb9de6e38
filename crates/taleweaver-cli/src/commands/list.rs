//! Paged story catalog.

use std::io::Write;

use taleweaver_core::api::StoryApi;
use taleweaver_story::application::catalog::{
    PageLink, PageRequest, StoryPage, fetch_page, page_links,
};

use crate::error::AppError;

/// Characters of opening text shown per story.
const PREVIEW_CHARS: usize = 100;

fn pager(page: &StoryPage, out: &mut impl Write) -> std::io::Result<()> {
    let current = page.request.page();
    match page.total_pages() {
        Some(total) if total > 1 => {
            let strip: Vec<String> = page_links(current, total)
                .into_iter()
                .map(|link| match link {
                    PageLink::Page(n) if n == current => format!("[{n}]"),
                    PageLink::Page(n) => n.to_string(),
                    PageLink::Gap => "...".to_owned(),
                })
                .collect();
            writeln!(out, "Page {current} of {total}: {}", strip.join(" "))?;
        }
        Some(_) => {}
        None => writeln!(out, "Page {current}")?,
    }
    if page.has_next() {
        writeln!(out, "Next: taleweaver list --page {}", page.request.next().page())?;
    }
    Ok(())
}

/// Prints one page of the story catalog.
///
/// # Errors
///
/// Returns `AppError::Catalog` if the stories cannot be listed, and
/// `AppError::Io` if the page cannot be written.
pub async fn list<W: Write>(
    request: PageRequest,
    api: &dyn StoryApi,
    out: &mut W,
) -> Result<(), AppError> {
    let page = fetch_page(request, api).await?;

    if page.stories.is_empty() {
        if request.page() > 1 {
            writeln!(out, "Page {} is empty.", request.page())?;
        } else {
            writeln!(
                out,
                "No stories found. Create your first adventure with `taleweaver create <theme>`."
            )?;
        }
        return Ok(());
    }

    writeln!(out, "Available Stories")?;
    for story in &page.stories {
        writeln!(out)?;
        writeln!(out, "{}  {}", story.id, story.title)?;
        if let Some(created) = story.created_at {
            writeln!(out, "    Created: {}", created.format("%Y-%m-%d"))?;
        }
        let preview = story.preview(PREVIEW_CHARS);
        if !preview.is_empty() {
            writeln!(out, "    {preview}...")?;
        }
        writeln!(out, "    Total Nodes: {}", story.node_count())?;
    }
    writeln!(out)?;
    pager(&page, out)?;
    Ok(())
}
