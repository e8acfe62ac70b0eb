//! The compatibility rewrite pipeline.
//!
//! Order matters here: data-shape detection must run before the PUT rewrite
//! so the method marker lands in the right container.

use serde_json::{Map, Value};

use crate::config::HttpConfig;

use super::payload::{FormData, Payload};
use super::{Method, RequestOptions};

/// Hidden payload field carrying the logical verb after an uploadable-PUT
/// rewrite, so the receiving side can recover the original intent.
pub const METHOD_MARKER: &str = "_method";

/// Normalizes a request in place: defaults the method to GET, then applies
/// the transport-compatibility rewrites for payload-bearing verbs.
///
/// The rewrite sequence, in this exact order:
/// 1. a non-empty selection whose first entry is a form element is unwrapped
///    to that element;
/// 2. a form element is replaced by a form-data container built from it;
/// 3. a form-data payload forces `cache`, `process_data` and `content_type`
///    to `false`, always together;
/// 4. a PUT with uploadable-PUT in effect goes out as POST, with a
///    `_method=PUT` marker injected into the form-data container or the
///    field mapping (created if the payload was empty).
///
/// Unrecognized payload shapes pass through untouched.
pub fn normalize(options: &mut RequestOptions, config: &HttpConfig) {
    let method = options.method.unwrap_or(Method::Get);
    options.method = Some(method);

    if !method.has_payload() {
        return;
    }

    if !options.data.is_empty() {
        if let Payload::ElementSet(set) = &options.data {
            if let Some(first) = set.first().cloned() {
                options.data = Payload::Element(first);
            }
        }

        if let Payload::Element(element) = &options.data {
            let form = FormData::from_element(element);
            options.data = Payload::FormData(form);
        }
    }

    if options.data.is_form_data() {
        options.cache = Some(false);
        options.process_data = Some(false);
        options.content_type = Some(false);
    }

    // PUT cannot carry file uploads on some transports; send it as POST with
    // the logical verb tucked into the payload.
    if method == Method::Put {
        let uploadable = options.uploadable_put.unwrap_or(config.uploadable_put);
        if uploadable {
            options.method = Some(Method::Post);
            match &mut options.data {
                Payload::FormData(form) => form.set(METHOD_MARKER, "PUT"),
                Payload::Fields(map) => {
                    map.insert(METHOD_MARKER.to_string(), Value::String("PUT".to_string()));
                }
                data @ Payload::Empty => {
                    let mut map = Map::new();
                    map.insert(METHOD_MARKER.to_string(), Value::String("PUT".to_string()));
                    *data = Payload::Fields(map);
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::payload::{FormElement, FormValue};
    use serde_json::json;

    fn options_for(method: Method, data: impl Into<Payload>) -> RequestOptions {
        let mut options = RequestOptions::new().with_data(data);
        options.method = Some(method);
        options
    }

    #[test]
    fn missing_method_defaults_to_get() {
        let mut options = RequestOptions::new();
        normalize(&mut options, &HttpConfig::default());
        assert_eq!(options.method, Some(Method::Get));
    }

    #[test]
    fn get_and_delete_never_touch_shape_flags() {
        for method in [Method::Get, Method::Delete] {
            let mut options = options_for(method, FormData::new().text("a", "b"));
            normalize(&mut options, &HttpConfig::default());
            assert_eq!(options.cache, None);
            assert_eq!(options.process_data, None);
            assert_eq!(options.content_type, None);
        }
    }

    #[test]
    fn single_element_selection_unwraps_and_becomes_form_data() {
        let element = FormElement::new().text("title", "x");
        let mut options = options_for(Method::Post, vec![element]);
        normalize(&mut options, &HttpConfig::default());
        match &options.data {
            Payload::FormData(form) => {
                assert_eq!(form.get("title"), Some(&FormValue::Text("x".into())));
            }
            other => panic!("expected form data, got: {other:?}"),
        }
    }

    #[test]
    fn form_data_forces_all_three_flags_together() {
        for method in [Method::Post, Method::Put, Method::Patch] {
            let mut options = options_for(method, FormData::new().text("a", "b"));
            normalize(&mut options, &HttpConfig::default());
            assert_eq!(options.cache, Some(false));
            assert_eq!(options.process_data, Some(false));
            assert_eq!(options.content_type, Some(false));
        }
    }

    #[test]
    fn uploadable_put_rewrites_method_and_marks_mapping() {
        let mut options = options_for(Method::Put, json!({"name": "x"}));
        normalize(&mut options, &HttpConfig::default());
        assert_eq!(options.method, Some(Method::Post));
        match &options.data {
            Payload::Fields(map) => assert_eq!(map[METHOD_MARKER], json!("PUT")),
            other => panic!("expected fields, got: {other:?}"),
        }
    }

    #[test]
    fn uploadable_put_marks_form_data_container() {
        let form = FormData::new().file("upload", "a.bin", vec![1, 2, 3]);
        let mut options = options_for(Method::Put, form);
        normalize(&mut options, &HttpConfig::default());
        assert_eq!(options.method, Some(Method::Post));
        match &options.data {
            Payload::FormData(form) => {
                assert_eq!(form.get(METHOD_MARKER), Some(&FormValue::Text("PUT".into())));
            }
            other => panic!("expected form data, got: {other:?}"),
        }
    }

    #[test]
    fn uploadable_put_creates_mapping_when_payload_absent() {
        let mut options = options_for(Method::Put, Payload::Empty);
        normalize(&mut options, &HttpConfig::default());
        match &options.data {
            Payload::Fields(map) => {
                assert_eq!(map.len(), 1);
                assert_eq!(map[METHOD_MARKER], json!("PUT"));
            }
            other => panic!("expected fields, got: {other:?}"),
        }
    }

    #[test]
    fn per_call_override_disables_the_put_rewrite() {
        let mut options = options_for(Method::Put, json!({"name": "x"})).with_uploadable_put(false);
        normalize(&mut options, &HttpConfig::default());
        assert_eq!(options.method, Some(Method::Put));
        match &options.data {
            Payload::Fields(map) => assert!(!map.contains_key(METHOD_MARKER)),
            other => panic!("expected fields, got: {other:?}"),
        }
    }

    #[test]
    fn config_default_disables_the_put_rewrite() {
        let config = HttpConfig::new().with_uploadable_put(false);
        let mut options = options_for(Method::Put, json!({"name": "x"}));
        normalize(&mut options, &config);
        assert_eq!(options.method, Some(Method::Put));
    }

    #[test]
    fn per_call_override_wins_over_config_default() {
        let config = HttpConfig::new().with_uploadable_put(false);
        let mut options = options_for(Method::Put, json!({})).with_uploadable_put(true);
        normalize(&mut options, &config);
        assert_eq!(options.method, Some(Method::Post));
    }

    #[test]
    fn plain_mapping_is_only_augmented_with_pipeline_fields() {
        let mut options = options_for(Method::Post, json!({"a": 1, "b": [2, 3]}));
        normalize(&mut options, &HttpConfig::default());
        match &options.data {
            Payload::Fields(map) => {
                assert_eq!(map["a"], json!(1));
                assert_eq!(map["b"], json!([2, 3]));
                assert_eq!(map.len(), 2);
            }
            other => panic!("expected fields, got: {other:?}"),
        }
        assert_eq!(options.cache, None);
        assert_eq!(options.process_data, None);
        assert_eq!(options.content_type, None);
    }

    #[test]
    fn unrecognized_shapes_pass_through_unchanged() {
        let mut options = options_for(Method::Post, json!("raw string body"));
        normalize(&mut options, &HttpConfig::default());
        assert_eq!(options.data, Payload::Raw(json!("raw string body")));
        assert_eq!(options.content_type, None);
    }
}
