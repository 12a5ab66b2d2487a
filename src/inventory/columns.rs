use crate::config::Config;

/// Header positions of the four columns an inventory sheet needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub document: usize,
    pub sub_file: usize,
    pub page: usize,
    pub title: usize,
}

/// First alias (in alias order) present among the headers.
pub fn find_column(headers: &[String], aliases: &[String]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|alias| headers.iter().position(|h| h == alias))
}

/// Resolve all four columns, or name the ones that are missing.
pub fn resolve_columns(
    headers: &[String],
    config: &Config,
) -> Result<ResolvedColumns, Vec<&'static str>> {
    let document = find_column(headers, &config.document_columns);
    let sub_file = find_column(headers, &config.sub_file_columns);
    let page = find_column(headers, &config.page_columns);
    let title = find_column(headers, &config.title_columns);

    match (document, sub_file, page, title) {
        (Some(document), Some(sub_file), Some(page), Some(title)) => Ok(ResolvedColumns {
            document,
            sub_file,
            page,
            title,
        }),
        _ => {
            let missing = [
                ("document", document),
                ("sub-file", sub_file),
                ("page", page),
                ("title", title),
            ]
            .into_iter()
            .filter(|(_, found)| found.is_none())
            .map(|(name, _)| name)
            .collect();
            Err(missing)
        }
    }
}
