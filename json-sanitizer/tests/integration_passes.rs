//! End-to-end behavior of session passes over realistic documents.

use json_sanitizer::{
    DetectionError, EntityRecognizer, KeySet, KeywordSet, RecognizedEntity, RegexDetector,
    SanitizationPass, Sanitizer, Session, SessionOptions, StatisticalDetector,
};
use serde_json::{Value, json};

fn regex_session() -> Session {
    Session::new(Box::new(RegexDetector::new()))
}

mod automatic_pass {
    use super::*;

    #[test]
    fn records_lose_secrets_nulls_and_pii() {
        let tree = json!([
            {"name": "Bob", "email": "bob@x.com", "password": "xyz", "note": null},
            {"name": "Ann", "api_key": "k-123", "phone": "555-123-4567", "tags": []},
        ]);
        let out = regex_session().run_automatic_pass(tree);
        assert_eq!(
            out,
            json!([
                {"name": "Bob", "email": "[EMAIL_REDACTED]"},
                {"name": "Ann", "phone": "[PHONE_REDACTED]", "tags": []},
            ])
        );
    }

    #[test]
    fn is_idempotent() {
        let tree = json!({
            "contact": {"email": "a@b.com", "ssn": "123-45-6789", "fax": null},
            "notes": ["call 555-123-4567", null, "fine"],
        });
        let session = regex_session();
        let once = session.run_automatic_pass(tree);
        let twice = session.run_automatic_pass(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn emptied_objects_stay() {
        let out = regex_session().run_automatic_pass(json!({"a": {"b": null}}));
        assert_eq!(out, json!({"a": {}}));
    }

    #[test]
    fn key_order_survives() {
        let tree: Value =
            serde_json::from_str(r#"{"zeta": 1, "token": "t", "alpha": "x@y.com", "mid": null, "beta": 2}"#)
                .unwrap();
        let out = regex_session().run_automatic_pass(tree);
        let keys: Vec<&str> = out.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha", "beta"]);
    }
}

mod sensitive_key_heuristic {
    use super::*;

    #[test]
    fn substring_matching_catches_lookalike_keys() {
        let tree = json!({
            "businessName": "Acme",
            "author": "Kim",
            "className": "A",
            "tokens_used": 3,
        });
        assert_eq!(regex_session().run_automatic_pass(tree), json!({}));
    }

    #[test]
    fn can_be_switched_off() {
        let session = regex_session().with_options(SessionOptions {
            sensitive_key_heuristic: false,
            ..SessionOptions::default()
        });
        let tree = json!({"author": "Kim", "tokens_used": 3});
        assert_eq!(session.run_automatic_pass(tree.clone()), tree);
    }
}

mod prune_empty {
    use super::*;

    fn pruning_session() -> Session {
        regex_session().with_options(SessionOptions {
            prune_empty: true,
            ..SessionOptions::default()
        })
    }

    #[test]
    fn off_by_default() {
        let tree = json!([{"name": "Ann", "nick": "", "tags": [], "meta": {}}]);
        assert_eq!(regex_session().run_automatic_pass(tree.clone()), tree);
    }

    #[test]
    fn drops_empty_strings_and_arrays_at_every_depth() {
        let tree = json!([
            {"name": "Ann", "nick": "", "tags": [], "meta": {}},
            {"name": "Ben", "phones": [null, ""], "address": {"street": "", "city": "Oslo"}},
            "",
        ]);
        assert_eq!(
            pruning_session().run_automatic_pass(tree),
            json!([
                {"name": "Ann", "meta": {}},
                {"name": "Ben", "address": {"city": "Oslo"}},
            ])
        );
    }

    #[test]
    fn applies_to_the_sweep_after_key_passes() {
        let tree = json!({"ids": [], "list": ["x"], "keep": true});
        let session = pruning_session();
        let out = session.run_key_pass(tree, &KeySet::new(["keep"]));
        assert_eq!(out, json!({"list": ["x"]}));
    }
}

mod keyword_pass {
    use super::*;

    #[test]
    fn matches_keys_and_values_case_insensitively() {
        let tree = json!({
            "internal_id": 7,
            "status": "INTERNAL review",
            "owner": "Carol",
            "flags": ["internal-only", "public"],
        });
        let out = regex_session().run_keyword_pass(tree, &KeywordSet::new(["internal"]));
        assert_eq!(out, json!({"owner": "Carol", "flags": ["public"]}));
    }

    #[test]
    fn matches_number_and_bool_text() {
        let tree = json!({"code": 4042, "ok": true, "label": "x"});
        let out = regex_session().run_keyword_pass(tree, &KeywordSet::new(["404", "TRUE"]));
        assert_eq!(out, json!({"label": "x"}));
    }
}

mod key_pass {
    use super::*;

    #[test]
    fn removes_keys_at_any_depth_by_default() {
        let tree = json!([
            {"id": 1, "mobileNumber": "x", "profile": {"bloodGroup": "A+", "city": "Oslo"}},
        ]);
        let out = regex_session().run_key_pass(tree, &KeySet::new(["MobileNumber", "bloodgroup"]));
        assert_eq!(out, json!([{"id": 1, "profile": {"city": "Oslo"}}]));
    }

    #[test]
    fn is_followed_by_a_null_sweep() {
        let tree = json!({"drop": 1, "keep": {"inner": null}});
        let out = regex_session().run_key_pass(tree, &KeySet::new(["drop"]));
        assert_eq!(out, json!({"keep": {}}));
    }
}

mod pass_sequence {
    use super::*;

    #[test]
    fn automatic_then_keyword_then_key() {
        let tree = json!([
            {
                "name": "Dan",
                "email": "dan@corp.com",
                "secret_answer": "blue",
                "department": "internal audit",
                "created": "2024-01-01",
                "address": {"street": null, "zip": "0150"},
            },
        ]);
        let session = regex_session();
        let tree = session.run_automatic_pass(tree);
        let tree = session.run_keyword_pass(tree, &KeywordSet::new(["internal"]));
        let tree = session.run_key_pass(tree, &KeySet::new(["created"]));
        assert_eq!(
            tree,
            json!([{"name": "Dan", "email": "[EMAIL_REDACTED]", "address": {"zip": "0150"}}])
        );
    }

    #[test]
    fn passes_without_pii_never_touch_strings() {
        let pass = SanitizationPass::nulls();
        let tree = json!({"mail": "a@b.com"});
        let out = Sanitizer::new(&RegexDetector::new()).sanitize(tree.clone(), &pass);
        assert_eq!(out, tree);
    }
}

mod statistical_backend {
    use super::*;

    struct Names;

    impl EntityRecognizer for Names {
        fn name(&self) -> &str {
            "names"
        }

        fn recognize(&self, text: &str) -> Result<Vec<RecognizedEntity>, DetectionError> {
            Ok(text
                .match_indices("Alice")
                .map(|(start, found)| RecognizedEntity {
                    label: "PERSON".into(),
                    start,
                    end: start + found.len(),
                    score: 0.9,
                })
                .collect())
        }
    }

    struct EmailWithStrayEntity;

    impl EntityRecognizer for EmailWithStrayEntity {
        fn name(&self) -> &str {
            "stray"
        }

        fn recognize(&self, _text: &str) -> Result<Vec<RecognizedEntity>, DetectionError> {
            Ok(vec![
                RecognizedEntity {
                    label: "EMAIL_ADDRESS".into(),
                    start: 5,
                    end: 14,
                    score: 0.99,
                },
                RecognizedEntity {
                    label: "PERSON".into(),
                    start: 3,
                    end: 3,
                    score: 0.6,
                },
            ])
        }
    }

    #[test]
    fn one_unusable_entity_does_not_hide_the_others() {
        let session = Session::new(Box::new(StatisticalDetector::new(Box::new(
            EmailWithStrayEntity,
        ))));
        let out = session.run_automatic_pass(json!({"n": "mail bob@x.com"}));
        assert_eq!(out, json!({"n": "mail [EMAIL_REDACTED]"}));
    }

    #[test]
    fn session_uses_injected_recognizer() {
        let session = Session::new(Box::new(StatisticalDetector::new(Box::new(Names))));
        let out = session.run_automatic_pass(json!({"note": "ask Alice", "id": 3}));
        assert_eq!(out, json!({"note": "ask [PERSON_REDACTED]", "id": 3}));
        assert_eq!(session.detector().name(), "statistical");
    }
}
