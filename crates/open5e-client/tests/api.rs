//! Integration tests for the Open5e client against a mock HTTP server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use open5e_client::{ClientError, ErrorSignal, Open5eApi, ReqwestGateway, Sources};
use open5e_core::{MagicItemFilter, MonsterFilter, RangeFilter};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api(server: &MockServer) -> Open5eApi {
    let gateway = ReqwestGateway::new(&server.uri(), Duration::from_secs(5)).unwrap();
    Open5eApi::new(gateway)
}

fn srd() -> Sources {
    Sources::from(vec!["wotc-srd"])
}

fn page(results: Value) -> Value {
    let count = results.as_array().map(|a| a.len()).unwrap_or(0);
    json!({"count": count, "next": null, "previous": null, "results": results})
}

#[derive(Default)]
struct RecordingSignal(Mutex<Vec<String>>);

impl ErrorSignal for RecordingSignal {
    fn raise(&self, error: &ClientError) {
        self.0.lock().unwrap().push(error.to_string());
    }
}

fn wizard() -> Value {
    json!({
        "slug": "wizard",
        "name": "Wizard",
        "hit_dice": "1d6",
        "subtypes_name": "Arcane Traditions",
        "archetypes": [
            {"slug": "school-of-evocation", "name": "School of Evocation", "desc": "Sculpt spells."},
            {"slug": "school-of-illusion", "name": "School of Illusion", "desc": null}
        ],
        "document__slug": "wotc-srd"
    })
}

// =============================================================================
// find_many / get / search
// =============================================================================

#[tokio::test]
async fn test_find_many_sends_limit_sources_and_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/monsters/"))
        .and(query_param("limit", "5000"))
        .and(query_param("document__slug__in", "wotc-srd,tob"))
        .and(query_param("ordering", "name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([
            {"slug": "aboleth", "name": "Aboleth"},
            {"slug": "adult-black-dragon", "name": "Adult Black Dragon"}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let results = api(&server)
        .find_many(
            "monsters",
            &Sources::from(vec!["wotc-srd", "tob"]),
            &[("ordering".to_string(), "name".to_string())],
        )
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["slug"], "aboleth");
}

#[tokio::test]
async fn test_repeated_queries_hit_the_network_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/spells/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([
            {"slug": "light", "name": "Light", "level_int": 0, "dnd_class": "Wizard"}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let api = api(&server);
    for _ in 0..3 {
        let spells = api.spells(&srd()).await.unwrap();
        assert_eq!(spells[0].name, "Light");
    }
    // The raw and typed views share the cache entry.
    let raw = api.find_many("spells", &srd(), &[]).await.unwrap();
    assert_eq!(raw.len(), 1);

    let stats = api.cache().stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 3);
}

#[tokio::test]
async fn test_changing_sources_refetches() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/backgrounds/"))
        .and(query_param("document__slug__in", "wotc-srd"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([
            {"slug": "acolyte", "name": "Acolyte"}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/backgrounds/"))
        .and(query_param("document__slug__in", "wotc-srd,a5e"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([
            {"slug": "acolyte", "name": "Acolyte"},
            {"slug": "artisan", "name": "Artisan"}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let api = api(&server);
    assert_eq!(api.backgrounds(&srd()).await.unwrap().len(), 1);
    let both = Sources::from(vec!["wotc-srd", "a5e"]);
    assert_eq!(api.backgrounds(&both).await.unwrap().len(), 2);
    assert_eq!(api.backgrounds(&srd()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_queries_are_deduplicated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sections/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page(json!([{"slug": "abilities", "name": "Abilities"}])))
                .set_delay(Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = api(&server);
    let sources = srd();
    let (a, b) = futures_util::future::join(api.sections(&sources), api.sections(&sources)).await;
    assert_eq!(a.unwrap(), b.unwrap());
}

#[tokio::test]
async fn test_get_joins_path_segments() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/monsters/goblin/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "slug": "goblin",
            "name": "Goblin",
            "cr": 0.25,
            "hit_points": 7,
            "size": "Small",
            "type": "humanoid"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api(&server);
    let raw = api.get(&["monsters", "goblin"], &[]).await.unwrap();
    assert_eq!(raw["name"], "Goblin");

    let goblin = api.monster("goblin").await.unwrap();
    assert_eq!(goblin.hit_points, 7);
    assert_eq!(goblin.monster_type, "humanoid");
}

#[tokio::test]
async fn test_documents_are_not_source_filtered() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/documents/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([
            {"slug": "wotc-srd", "title": "5e Core Rules"},
            {"slug": "tob", "title": "Tome of Beasts"}
        ]))))
        .mount(&server)
        .await;

    let docs = api(&server).documents().await.unwrap();
    assert_eq!(docs.len(), 2);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(
        !requests[0]
            .url
            .query_pairs()
            .any(|(k, _)| k == "document__slug__in")
    );
}

#[tokio::test]
async fn test_search() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/"))
        .and(query_param("text", "fire"))
        .and(query_param("document__slug__in", "wotc-srd"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([
            {"slug": "fireball", "name": "Fireball", "route": "spells/", "text": "A bright streak", "document_slug": "wotc-srd", "document_title": null},
            {"slug": "fire-giant", "name": "Fire Giant", "route": "monsters/", "text": "", "document_slug": "wotc-srd"}
        ]))))
        .mount(&server)
        .await;

    let hits = api(&server).search("fire", &srd()).await.unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].route, "spells/");
    assert_eq!(hits[0].document_title, "");
    assert_eq!(hits[1].name, "Fire Giant");
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_http_errors_propagate_and_are_not_cached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/magicitems/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(2)
        .mount(&server)
        .await;

    let api = api(&server);
    for _ in 0..2 {
        let err = api.magic_items(&srd()).await.unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 500, ref body } if body == "boom"));
    }
    assert!(api.cache().is_empty());
}

#[tokio::test]
async fn test_detail_404_uses_service_detail_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/spells/nope/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})))
        .mount(&server)
        .await;

    let err = api(&server).spell("nope").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "HTTP 404: Not found.");
}

#[tokio::test]
async fn test_list_without_results_is_a_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/classes/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
        .mount(&server)
        .await;

    let err = api(&server).classes(&srd()).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
}

// =============================================================================
// Archetype lookup
// =============================================================================

#[tokio::test]
async fn test_archetype_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/classes/wizard/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(wizard()))
        .mount(&server)
        .await;

    let signal = Arc::new(RecordingSignal::default());
    let api = api(&server).with_signal(signal.clone());

    let archetype = api.archetype("wizard", "school-of-evocation").await.unwrap();
    assert_eq!(archetype.name, "School of Evocation");

    let illusion = api.archetype("wizard", "school-of-illusion").await.unwrap();
    assert_eq!(illusion.desc, "");

    assert!(signal.0.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_archetype_not_found_raises_signal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/classes/wizard/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(wizard()))
        .mount(&server)
        .await;

    let signal = Arc::new(RecordingSignal::default());
    let api = api(&server).with_signal(signal.clone());

    let err = api
        .archetype("wizard", "school-of-chronurgy")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::NotFound { ref kind, ref slug }
            if kind == "archetype" && slug == "wizard/school-of-chronurgy"
    ));
    assert_eq!(
        *signal.0.lock().unwrap(),
        vec!["archetype not found: wizard/school-of-chronurgy".to_string()]
    );
}

// =============================================================================
// Filtering and grouping over fetched data
// =============================================================================

#[tokio::test]
async fn test_filtered_monsters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/monsters/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([
            {"slug": "goblin", "name": "Goblin", "cr": 0.25, "hit_points": 7, "size": "Small", "type": "humanoid"},
            {"slug": "hill-giant", "name": "Hill Giant", "cr": 5, "hit_points": 105, "size": "Huge", "type": "giant"},
            {"slug": "lich", "name": "Lich", "cr": 21, "hit_points": 135, "size": "Medium", "type": "undead"}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let api = api(&server);
    let filter = MonsterFilter {
        cr: RangeFilter::between(0.0, 10.0),
        ..Default::default()
    };
    let names: Vec<String> = api
        .filtered_monsters(&srd(), &filter)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(names, vec!["Goblin", "Hill Giant"]);

    let all = api
        .filtered_monsters(&srd(), &MonsterFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn test_filtered_magic_items() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/magicitems/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([
            {"slug": "bag-of-holding", "name": "Bag of Holding", "type": "Wondrous item", "rarity": "uncommon", "requires_attunement": ""},
            {"slug": "ring-of-protection", "name": "Ring of Protection", "type": "Ring", "rarity": "rare", "requires_attunement": "requires attunement"}
        ]))))
        .mount(&server)
        .await;

    let api = api(&server);
    let filter = MagicItemFilter {
        requires_attunement: Some(true),
        ..Default::default()
    };
    assert_eq!(api.filtered_magic_items(&srd(), &filter).await.unwrap().len(), 2);

    let filter = MagicItemFilter {
        item_type: Some("Ring".to_string()),
        ..Default::default()
    };
    let rings = api.filtered_magic_items(&srd(), &filter).await.unwrap();
    assert_eq!(rings.len(), 1);
    assert_eq!(rings[0].slug, "ring-of-protection");
}

#[tokio::test]
async fn test_spells_by_class() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/spells/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([
            {"slug": "fire-bolt", "name": "Fire Bolt", "level_int": 0, "dnd_class": "Sorcerer, Wizard"},
            {"slug": "sacred-flame", "name": "Sacred Flame", "level_int": 0, "dnd_class": "Cleric"},
            {"slug": "fireball", "name": "Fireball", "level_int": 3, "dnd_class": "Sorcerer, Wizard"},
            {"slug": "light", "name": "Light", "level_int": 0, "dnd_class": "Bard, Cleric, Sorcerer, Wizard"},
            {"slug": "shield", "name": "Shield", "level_int": 1, "dnd_class": "Sorcerer, Wizard"}
        ]))))
        .mount(&server)
        .await;

    let groups = api(&server).spells_by_class(&srd(), "wizard").await.unwrap();

    let summary: Vec<(i64, String, usize)> = groups
        .iter()
        .map(|g| (g.level, g.label.to_string(), g.spells.len()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (0, "Cantrip".to_string(), 2),
            (1, "1st-level".to_string(), 1),
            (3, "3rd-level".to_string(), 1),
        ]
    );
    assert_eq!(groups[0].spells[0].name, "Fire Bolt");
    assert_eq!(groups[0].spells[1].name, "Light");
}
