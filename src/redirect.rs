//! Legacy vehicle URLs (`/ag-<ids>-<slug>.html`) mapped onto
//! `/search?fitment_pairs=...`.
//!
//! The redirect table maps old paths to new destinations. Paths not in the
//! table are matched heuristically against the table's `/ag-` entries:
//! one or two ids select the same number of pairs from a canonical entry,
//! three or more ids compare year plus a normalized vehicle slug.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;

use crate::search::SEARCH_PATH;

pub const LEGACY_PREFIX: &str = "/ag-";

struct Canonical {
    /// Lowercased text after the ids.
    text: String,
    /// Lowercased slug without the ids prefix (year first, when present).
    slug: String,
    destination: String,
}

struct Patterns {
    legacy_path: Regex,
    leading_year: Regex,
    fitment_pairs: Regex,
    repeated_dash: Regex,
    displacement: Regex,
    cylinders: Regex,
    engine_layout: Regex,
    non_word: Regex,
}

impl Patterns {
    /// ASCII classes throughout; non-ASCII letters are not word characters.
    fn new() -> Result<Self> {
        let re = |p: &str| Regex::new(p).with_context(|| format!("compile pattern {}", p));
        Ok(Self {
            legacy_path: re(r"^/ag-([0-9.]+)-(.+)\.html$")?,
            leading_year: re(r"^([0-9]{4})-")?,
            fitment_pairs: re(r"fitment_pairs=([^&]+)")?,
            repeated_dash: re(r"--+")?,
            displacement: re(r"([0-9])-?([0-9])l(\.[0-9]+)?")?,
            cylinders: re(r"(?-u:\b)[0-9]+-?(cyl|cylinder|cylinders)?(?-u:\b)")?,
            engine_layout: re(r"(?-u:\b)(v|l)[0-9]+(?-u:\b)")?,
            non_word: re(r"[^A-Za-z0-9_-]+")?,
        })
    }
}

pub struct RedirectTable {
    exact: HashMap<String, String>,
    canonical: Vec<Canonical>,
    patterns: Patterns,
}

impl RedirectTable {
    /// Entries are scanned in key order when matching heuristically.
    pub fn from_map(map: BTreeMap<String, String>) -> Result<Self> {
        let patterns = Patterns::new()?;
        let mut canonical = Vec::new();
        for (from, to) in &map {
            let Some(caps) = patterns.legacy_path.captures(from) else {
                continue;
            };
            let text = caps[2].to_lowercase();
            let ids = &caps[1];
            let slug = from[LEGACY_PREFIX.len() + ids.len() + 1..]
                .trim_end_matches(".html")
                .to_lowercase();
            canonical.push(Canonical {
                text,
                slug,
                destination: to.clone(),
            });
        }
        Ok(Self {
            exact: map.into_iter().collect(),
            canonical,
            patterns,
        })
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let map: BTreeMap<String, String> =
            serde_json::from_slice(bytes).context("parse redirect table")?;
        Self::from_map(map)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read redirects {}", path.display()))?;
        Self::from_json(&bytes).with_context(|| format!("load redirects {}", path.display()))
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }

    /// Destination for `pathname`, or `None` when it is not a redirect.
    /// Unmatched `/ag-` paths land on the bare search page.
    pub fn resolve(&self, pathname: &str) -> Option<String> {
        if let Some(to) = self.exact.get(pathname) {
            return Some(to.clone());
        }
        if !pathname.starts_with(LEGACY_PREFIX) {
            return None;
        }

        let (ids, text) = match self.patterns.legacy_path.captures(pathname) {
            Some(caps) => {
                let ids = caps[1]
                    .split('.')
                    .filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
                    .count();
                (ids, caps[2].to_string())
            }
            None => (0, String::new()),
        };

        let found = match ids {
            1 | 2 if !text.is_empty() => self.by_text(&text, ids),
            n if n >= 3 => self.by_vehicle(pathname),
            _ => None,
        };
        Some(found.unwrap_or_else(|| SEARCH_PATH.to_string()))
    }

    /// Picks `take` consecutive pairs from the first canonical entry whose
    /// text contains the incoming text.
    fn by_text(&self, text: &str, take: usize) -> Option<String> {
        let search = self
            .patterns
            .repeated_dash
            .replace_all(&text.to_lowercase(), "-")
            .into_owned();
        let search_parts = significant_tokens(&search);

        for entry in &self.canonical {
            if !entry.text.contains(&search) {
                continue;
            }
            let parts = significant_tokens(&entry.text);
            let Some(index) = parts.iter().position(|p| {
                search_parts
                    .iter()
                    .any(|sp| p.contains(sp.as_str()) || sp.contains(p.as_str()))
            }) else {
                continue;
            };

            let Some(caps) = self.patterns.fitment_pairs.captures(&entry.destination) else {
                continue;
            };
            let pairs = caps[1].split(',').collect::<Vec<_>>();
            if index >= pairs.len() {
                continue;
            }
            let end = (index + take).min(pairs.len());
            return Some(format!(
                "{}?fitment_pairs={}",
                SEARCH_PATH,
                pairs[index..end].join(",")
            ));
        }
        None
    }

    fn by_vehicle(&self, pathname: &str) -> Option<String> {
        let rest = &pathname[LEGACY_PREFIX.len()..];
        let rest = rest.trim_end_matches(".html");
        let slug = match rest.find('-') {
            Some(i) if rest[..i].bytes().all(|b| b.is_ascii_digit() || b == b'.') => {
                &rest[i + 1..]
            }
            _ => rest,
        };

        let (year, vehicle) = self.split_year(slug);
        let vehicle = self.normalize_vehicle(vehicle);

        self.canonical
            .iter()
            .find(|entry| {
                let (c_year, c_vehicle) = self.split_year(&entry.slug);
                c_year == year && self.normalize_vehicle(c_vehicle) == vehicle
            })
            .map(|entry| entry.destination.clone())
    }

    fn split_year<'a>(&self, slug: &'a str) -> (Option<&'a str>, &'a str) {
        match self.patterns.leading_year.captures(slug) {
            Some(caps) => {
                let year = caps.get(1).map(|m| m.as_str());
                let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
                (year, &slug[end..])
            }
            None => (None, slug),
        }
    }

    /// Order-insensitive vehicle key: `2-0l` becomes `20l`, cylinder counts
    /// and `v6`/`l4` layouts drop out, tokens are sorted.
    fn normalize_vehicle(&self, slug: &str) -> String {
        let s = slug.to_lowercase();
        let s = s.trim_end_matches(".html");
        let s = self.patterns.displacement.replace_all(s, "${1}${2}l");
        let s = self.patterns.cylinders.replace_all(&s, "");
        let s = self.patterns.engine_layout.replace_all(&s, "");
        let s = self.patterns.non_word.replace_all(&s, "");
        let mut tokens = s.split('-').filter(|t| !t.is_empty()).collect::<Vec<_>>();
        tokens.sort_unstable();
        tokens.join("-")
    }
}

fn significant_tokens(s: &str) -> Vec<String> {
    s.split('-')
        .filter(|p| p.len() > 1)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "tests/redirect_tests.rs"]
mod tests;
