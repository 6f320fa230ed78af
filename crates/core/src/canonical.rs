#![forbid(unsafe_code)]

use url::Url;

/// Partition key used when a locator has no usable host.
pub const FALLBACK_PARTITION: &str = "unknown";

/// Query parameter names that never change which page a locator points at.
const TRACKING_PARAMS: &[&str] = &[
    "gclid",
    "dclid",
    "gbraid",
    "wbraid",
    "fbclid",
    "msclkid",
    "yclid",
    "twclid",
    "igshid",
    "mc_cid",
    "mc_eid",
    "ref_src",
    "s_kwcid",
    "vero_id",
    "wickedid",
    "oly_anon_id",
    "oly_enc_id",
];

const TRACKING_PREFIXES: &[&str] = &["utm_"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalLocator {
    pub id: String,
    pub partition_key: String,
}

/// Maps a raw locator to its canonical id and partition key.
///
/// Total and deterministic: malformed input falls back to the identity
/// mapping with the `"unknown"` partition instead of failing. Tracking
/// parameters are dropped so two locators that differ only by campaign
/// noise share one id, and the query separator disappears entirely when
/// nothing survives the filter.
pub fn canonicalize(raw: &str) -> CanonicalLocator {
    let Ok(mut url) = Url::parse(raw) else {
        return CanonicalLocator {
            id: raw.to_string(),
            partition_key: FALLBACK_PARTITION.to_string(),
        };
    };

    strip_tracking_params(&mut url);
    url.set_fragment(None);

    let partition_key = url
        .host_str()
        .map(|host| host.strip_prefix("www.").unwrap_or(host))
        .filter(|host| !host.is_empty())
        .map_or_else(|| FALLBACK_PARTITION.to_string(), str::to_string);

    CanonicalLocator {
        id: String::from(url),
        partition_key,
    }
}

fn is_tracking_param(name: &str) -> bool {
    let lowered = name.to_ascii_lowercase();
    TRACKING_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
        || TRACKING_PARAMS.contains(&lowered.as_str())
}

fn strip_tracking_params(url: &mut Url) {
    if url.query().is_none() {
        return;
    }

    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(name, _)| !is_tracking_param(name))
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    if retained.is_empty() {
        url.set_query(None);
        return;
    }

    let mut query = url::form_urlencoded::Serializer::new(String::new());
    for (name, value) in &retained {
        query.append_pair(name, value);
    }
    url.set_query(Some(&query.finish()));
}
