use chrono::Local;
use serde_json::{Map, Value};

use crate::tweet::CanonicalTweet;

type Accessor = fn(&CanonicalTweet) -> Value;

/// Registry of projectable attribute names. Each configured name maps to
/// a typed accessor over the canonical record; unknown names fall through
/// to an empty value at projection time.
fn accessor(name: &str) -> Option<Accessor> {
    Some(match name {
        "created_at" => |t| Value::from(t.created_at.as_str()),
        "id" => |t| Value::from(t.id),
        "id_str" => |t| Value::from(t.id_str.as_str()),
        "text" => |t| Value::from(t.text.as_str()),
        "source" => |t| opt_str(&t.source),
        "truncated" => |t| Value::from(t.truncated),
        "in_reply_to_status_id" => |t| opt_u64(t.in_reply_to_status_id),
        "in_reply_to_status_id_str" => |t| opt_str(&t.in_reply_to_status_id_str),
        "in_reply_to_user_id" => |t| opt_u64(t.in_reply_to_user_id),
        "in_reply_to_user_id_str" => |t| opt_str(&t.in_reply_to_user_id_str),
        "in_reply_to_screen_name" => |t| opt_str(&t.in_reply_to_screen_name),
        "user" => |t| opt_str(&t.user),
        "name" => |t| opt_str(&t.name),
        "username" => |t| opt_str(&t.username),
        "coordinates" => |t| t.coordinates.clone().unwrap_or(Value::Null),
        "place" => |t| opt_str(&t.place),
        "is_quote_status" => |t| t.is_quote_status.map(Value::from).unwrap_or(Value::Null),
        "quoted_status" => |t| opt_str(&t.quoted_status),
        "quoted_status_id_str" => |t| opt_str(&t.quoted_status_id_str),
        "quote_count" => |t| opt_u64(t.quote_count),
        "retweet_count" => |t| opt_u64(t.retweet_count),
        "favorite_count" => |t| opt_u64(t.favorite_count),
        "entities" => |t| t.entities.clone().unwrap_or(Value::Null),
        "retweeted" => |t| Value::from(t.retweeted),
        "possibly_sensitive" => |t| Value::from(t.possibly_sensitive),
        "lang" => |t| opt_str(&t.lang),
        // Only present on resolved replies; projects as empty otherwise.
        "reply_text" => |t| Value::from(t.reply_text.as_deref().unwrap_or("")),
        _ => return None,
    })
}

/// Map-valued fields addressable through composite `container-key` names.
fn container<'a>(tweet: &'a CanonicalTweet, name: &str) -> Option<&'a Value> {
    match name {
        "entities" => tweet.entities.as_ref(),
        "coordinates" => tweet.coordinates.as_ref(),
        _ => None,
    }
}

/// Value of one configured attribute. Composite names index a single key
/// inside a container field and stringify the entry; a missing container
/// or key projects as empty.
fn attribute_value(tweet: &CanonicalTweet, name: &str) -> Value {
    if let Some((outer, key)) = name.split_once('-') {
        return container(tweet, outer)
            .and_then(|v| v.get(key))
            .map(|v| Value::from(render(v)))
            .unwrap_or_else(|| Value::from(""));
    }
    match accessor(name) {
        Some(get) => get(tweet),
        None => Value::from(""),
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn opt_str(value: &Option<String>) -> Value {
    value.as_deref().map(Value::from).unwrap_or(Value::Null)
}

fn opt_u64(value: Option<u64>) -> Value {
    value.map(Value::from).unwrap_or(Value::Null)
}

/// Ordered row for file output, one rendered field per configured
/// attribute name.
pub fn project_row(tweet: &CanonicalTweet, attributes: &[String]) -> Vec<String> {
    attributes
        .iter()
        .map(|name| render(&attribute_value(tweet, name)))
        .collect()
}

/// Keyed record for store output, stamped with the collection time.
pub fn project_document(tweet: &CanonicalTweet, attributes: &[String]) -> Map<String, Value> {
    let crawled_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    project_document_at(tweet, attributes, &crawled_at)
}

fn project_document_at(
    tweet: &CanonicalTweet,
    attributes: &[String],
    crawled_at: &str,
) -> Map<String, Value> {
    let mut document = Map::new();
    for name in attributes {
        document.insert(name.clone(), attribute_value(tweet, name));
    }
    document.insert("crawled_at".to_string(), Value::from(crawled_at));
    document
}

#[cfg(test)]
mod test {
    use super::*;

    fn attrs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn tweet() -> CanonicalTweet {
        CanonicalTweet {
            id: 42,
            id_str: "42".to_string(),
            text: "some text".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn missing_container_projects_empty() {
        let row = project_row(&tweet(), &attrs(&["id_str", "entities-hashtags"]));
        assert_eq!(row, vec!["42".to_string(), String::new()]);

        let doc = project_document_at(&tweet(), &attrs(&["id_str", "entities-hashtags"]), "now");
        assert_eq!(doc["id_str"], Value::from("42"));
        assert_eq!(doc["entities-hashtags"], Value::from(""));
    }

    #[test]
    fn composite_entry_is_stringified() {
        let mut t = tweet();
        t.entities = Some(serde_json::json!({"hashtags": ["covid"]}));

        let row = project_row(&t, &attrs(&["entities-hashtags"]));
        assert_eq!(row, vec![r#"["covid"]"#.to_string()]);
    }

    #[test]
    fn absent_optional_fields_render_empty() {
        let row = project_row(&tweet(), &attrs(&["place", "reply_text", "lang", "retweeted"]));
        assert_eq!(
            row,
            vec![
                String::new(),
                String::new(),
                String::new(),
                "false".to_string()
            ]
        );
    }

    #[test]
    fn unknown_attribute_renders_empty() {
        let row = project_row(&tweet(), &attrs(&["no_such_field"]));
        assert_eq!(row, vec![String::new()]);
    }

    #[test]
    fn document_is_stamped_with_crawled_at() {
        let doc = project_document(&tweet(), &attrs(&["id_str"]));
        assert!(doc.contains_key("crawled_at"));
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn document_keeps_typed_values() {
        let doc = project_document_at(&tweet(), &attrs(&["id", "truncated"]), "now");
        assert_eq!(doc["id"], Value::from(42u64));
        assert_eq!(doc["truncated"], Value::from(false));
    }
}
