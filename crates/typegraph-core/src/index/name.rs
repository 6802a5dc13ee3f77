use crate::{
    ast::VectorMetric,
    index::{columns::{EdgeIndexDirection, IndexScope}, definition::IndexTarget},
};
use typegraph_schema::JsonPointer;

///
/// Index naming
///
/// All identifiers are deterministic: the same specification always
/// yields the same name, confined to `[a-z0-9_]` and at most 63 bytes.
///

/// Maximum identifier length accepted by the backends.
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Base length the name is cut back to before re-appending the hash when
/// it overflows.
const TRUNCATED_BASE_LEN: usize = 54;

/// Per-component cap applied by the sanitizer.
const COMPONENT_LEN: usize = 20;

/// Lowercase, collapse anything outside `[a-z0-9_]` to `_`, strip
/// leading/trailing `_`, cap at 20 characters.
#[must_use]
pub fn sanitize_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        let lower = c.to_ascii_lowercase();
        if lower.is_ascii_lowercase() || lower.is_ascii_digit() || lower == '_' {
            out.push(lower);
        } else {
            out.push('_');
        }
    }
    let trimmed = out.trim_matches('_');
    trimmed.chars().take(COMPONENT_LEN).collect()
}

/// FNV-1a 32-bit.
#[must_use]
pub const fn fnv1a_32(bytes: &[u8]) -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u32;
        hash = hash.wrapping_mul(0x0100_0193);
        i += 1;
    }
    hash
}

#[must_use]
pub fn base36(mut value: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).expect("base36 digits are ascii")
}

fn pointer_component(pointer: &JsonPointer) -> String {
    sanitize_component(&pointer.segments().join("_"))
}

/// Derive the default props-index name:
/// `idx_tg_{node|edge}_{kind}_{fields}_[cov_{fields}_][uniq_]{hash}` with
/// the base-36 FNV-1a hash of the canonical JSON spec rendering, cut back
/// to 54 characters (hash re-appended) when the identifier overflows.
#[must_use]
pub fn derive_index_name(
    target: IndexTarget,
    kind_name: &str,
    fields: &[JsonPointer],
    covering: &[JsonPointer],
    unique: bool,
    scope: IndexScope,
    direction: EdgeIndexDirection,
) -> String {
    let spec = serde_json::json!({
        "kind": kind_name,
        "unique": unique,
        "scope": scope,
        "direction": direction,
        "fields": fields.iter().map(JsonPointer::encoded).collect::<Vec<_>>(),
        "covering": covering.iter().map(JsonPointer::encoded).collect::<Vec<_>>(),
    });
    let hash = base36(fnv1a_32(spec.to_string().as_bytes()));

    let mut parts: Vec<String> = vec![
        "idx".to_string(),
        "tg".to_string(),
        match target {
            IndexTarget::Node => "node".to_string(),
            IndexTarget::Edge => "edge".to_string(),
        },
        sanitize_component(kind_name),
    ];
    parts.extend(fields.iter().map(pointer_component));
    if !covering.is_empty() {
        parts.push("cov".to_string());
        parts.extend(covering.iter().map(pointer_component));
    }
    if unique {
        parts.push("uniq".to_string());
    }

    let base = format!("{}_", parts.join("_"));
    let name = format!("{base}{hash}");
    if name.len() <= MAX_IDENTIFIER_LEN {
        return name;
    }

    format!("{}{hash}", &base[..TRUNCATED_BASE_LEN])
}

/// Derive the deterministic vector-index identifier
/// `idx_emb_{graph}_{kind}_{field}_{metric}`.
#[must_use]
pub fn derive_vector_index_name(
    graph_id: &str,
    node_kind: &str,
    field_path: &JsonPointer,
    metric: Option<VectorMetric>,
) -> String {
    let metric = metric.unwrap_or(VectorMetric::Cosine);

    format!(
        "idx_emb_{}_{}_{}_{}",
        sanitize_component(graph_id),
        sanitize_component(node_kind),
        pointer_component(field_path),
        sanitize_component(&metric.to_string()),
    )
}
