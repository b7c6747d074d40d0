//! Name and ID resolution for CLI arguments.
//!
//! Commands accept either a record key (`series:MOON` / `MOON`) or a display
//! name ("Moon Saga"). Exact name matches win; otherwise close names are
//! suggested by edit distance.

use anyhow::{anyhow, Result};

use crate::init::AppContext;
use crate::models::{Persona, Series};
use crate::services::roster;

/// Strip a known table prefix from an entity ID, returning the bare key.
/// e.g. "series:MOON" -> "MOON", "MOON" -> "MOON"
pub fn bare_key(id: &str, prefix: &str) -> String {
    id.strip_prefix(&format!("{}:", prefix))
        .unwrap_or(id)
        .to_string()
}

/// Similarity of two names, case-insensitive, in 0.0..=1.0.
fn name_similarity(a: &str, b: &str) -> f64 {
    use rapidfuzz::distance::levenshtein;
    levenshtein::normalized_similarity(a.to_lowercase().chars(), b.to_lowercase().chars())
}

fn suggestions<'a, I>(input: &str, names: I) -> Vec<String>
where
    I: Iterator<Item = &'a str>,
{
    let mut scored: Vec<(f64, &str)> = names
        .map(|n| (name_similarity(input, n), n))
        .filter(|(score, _)| *score >= 0.6)
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().take(3).map(|(_, n)| n.to_string()).collect()
}

fn not_found(kind: &str, input: &str, close: Vec<String>) -> anyhow::Error {
    if close.is_empty() {
        anyhow!("No {} matches '{}'.", kind, input)
    } else {
        anyhow!(
            "No {} matches '{}'. Did you mean: {}?",
            kind,
            input,
            close.join(", ")
        )
    }
}

/// Resolve a series from a slug, `series:slug` id, or display name.
pub async fn resolve_series(ctx: &AppContext, input: &str) -> Result<Series> {
    use crate::models::series;

    let key = bare_key(input, "series");
    if let Some(found) = series::get_series(&ctx.db, &key).await? {
        return Ok(found);
    }

    let all = series::list_series(&ctx.db).await?;
    if let Some(found) = all
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(input) || s.slug.eq_ignore_ascii_case(input))
    {
        return Ok(found.clone());
    }

    let close = suggestions(input, all.iter().map(|s| s.name.as_str()));
    Err(not_found("series", input, close))
}

/// Resolve a persona from a `persona:key` id or display name.
pub async fn resolve_persona(ctx: &AppContext, input: &str) -> Result<Persona> {
    use crate::models::persona;

    let key = bare_key(input, "persona");
    if let Some(found) = persona::get_persona(&ctx.db, &key).await? {
        return Ok(found);
    }

    let all = persona::list_personas(&ctx.db).await?;
    let matches: Vec<&Persona> = all
        .iter()
        .filter(|p| p.name.eq_ignore_ascii_case(input))
        .collect();
    match matches.as_slice() {
        [one] => Ok((*one).clone()),
        [] => {
            let close = suggestions(input, all.iter().map(|p| p.name.as_str()));
            Err(not_found("persona", input, close))
        }
        many => Err(anyhow!(
            "'{}' is ambiguous; use an id: {}",
            input,
            many.iter()
                .map(|p| p.id.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )),
    }
}

/// Resolve a character from a `character:key` id or its primary persona's name.
pub async fn resolve_character(ctx: &AppContext, input: &str) -> Result<crate::models::Character> {
    use crate::models::character;

    let key = bare_key(input, "character");
    if let Some(found) = character::get_character(&ctx.db, &key).await? {
        return Ok(found);
    }

    // fall back to persona-name lookup: a character is known by its personas
    let persona = resolve_persona(ctx, input).await?;
    character::get_character(&ctx.db, &persona.character.key().to_string())
        .await?
        .ok_or_else(|| anyhow!("Persona '{}' has no character.", persona.name))
}

/// Resolve an installment by key, or by series + number path segment
/// ("MOON/7-11" style input).
pub async fn resolve_installment(
    ctx: &AppContext,
    input: &str,
) -> Result<crate::models::Installment> {
    use crate::models::installment;
    use crate::utils::numeral::IssueNumber;

    let key = bare_key(input, "installment");
    if let Some(found) = installment::get_installment(&ctx.db, &key).await? {
        return Ok(found);
    }

    if let Some((series_part, number_part)) = input.split_once('/') {
        let series = resolve_series(ctx, series_part).await?;
        let number: IssueNumber = number_part
            .parse()
            .map_err(|e| anyhow!("{}", e))?;
        if let Some(found) = installment::find_by_number(&ctx.db, &series.id, number).await? {
            return Ok(found);
        }
        return Err(anyhow!(
            "{} has no installment numbered {}.",
            series.name,
            number
        ));
    }

    Err(anyhow!("No installment matches '{}'.", input))
}

/// Resolve a character and render its display name in one go.
pub async fn character_with_name(
    ctx: &AppContext,
    input: &str,
) -> Result<(crate::models::Character, String)> {
    let chr = resolve_character(ctx, input).await?;
    let name = roster::display_name(&ctx.db, &chr).await?;
    Ok((chr, name))
}
