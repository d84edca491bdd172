//! End-to-end tests over canned service payloads.
//!
//! A fixture transport stands in for the live service: it reads the
//! `method` and `format` parameters off the request URL and replays
//! `tests/fixtures/<method>.<format>`. A missing fixture replays as an
//! empty 200 body, which is how the service signals a failed request.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use raventools::{Client, Error, Format, Link, Params, RawResponse, Result, Transport};

struct FixtureTransport;

impl Transport for FixtureTransport {
    fn fetch(&self, url: &str) -> Result<RawResponse> {
        let parsed = url::Url::parse(url).expect("well-formed request URL");
        let mut method = None;
        let mut format = None;
        for (name, value) in parsed.query_pairs() {
            match name.as_ref() {
                "method" => method = Some(value.into_owned()),
                "format" => format = Some(value.into_owned()),
                _ => {}
            }
        }
        let name = format!(
            "{}.{}",
            method.expect("method parameter"),
            format.expect("format parameter")
        );
        let body = fs::read_to_string(fixture_path(&name)).unwrap_or_default();
        Ok(RawResponse { status: 200, body })
    }
}

fn fixture_path(name: &str) -> PathBuf {
    [env!("CARGO_MANIFEST_DIR"), "tests", "fixtures", name]
        .iter()
        .collect()
}

fn fixture(name: &str) -> String {
    fs::read_to_string(fixture_path(name)).expect("fixture exists")
}

fn fixture_client(format: Format) -> Client {
    Client::builder("test-key")
        .format(format)
        .transport(Arc::new(FixtureTransport))
        .build()
        .expect("client builds")
}

#[test]
fn profile_info_decodes_to_the_account_record() {
    let client = fixture_client(Format::Json);
    let response = client.get_profile_info().unwrap();
    let value = response.as_json().unwrap();
    assert!(value.get("name").is_some());
    assert!(value.get("keyword_usage").is_some());
}

#[test]
fn domains_json_and_xml_agree_on_the_record_count() {
    let client = fixture_client(Format::Json);
    let response = client.list_domains().unwrap();
    let domains = response.as_json().unwrap().as_array().expect("array").len();

    // Independent count straight from the fixture file.
    let raw: serde_json::Value = serde_json::from_str(&fixture("domains.json")).unwrap();
    assert_eq!(domains, raw.as_array().unwrap().len());

    let client = fixture_client(Format::Xml);
    let response = client.list_domains().unwrap();
    let doc = response.as_xml().unwrap();
    assert_eq!(doc.root().name(), "Raven");
    let listed = doc.root().child("domains").expect("domains element");
    assert_eq!(listed.children_named("domain").count(), domains);
    assert_eq!(
        listed.children()[0].text(),
        raw.as_array().unwrap()[0].as_str().unwrap()
    );
}

#[test]
fn engines_catalog_lists_named_engines() {
    let client = fixture_client(Format::Json);
    let response = client.list_engines().unwrap();
    let engines = response.into_json().unwrap();
    let engines = engines.as_array().unwrap();
    assert!(!engines.is_empty());
    assert_eq!(engines[0]["name"], "Yahoo! GR");
    assert!(engines.iter().all(|e| e.get("id").is_some()));
}

#[test]
fn domain_info_lists_tracked_engines() {
    let client = fixture_client(Format::Json);
    let response = client.get_domain_info("www.centresource.com").unwrap();
    let info = response.into_json().unwrap();
    assert!(info.as_array().unwrap().iter().all(|e| e.get("engine_id").is_some()));
}

#[test]
fn single_keyword_rank_is_keyed_by_engine() {
    let client = fixture_client(Format::Json);
    let response = client
        .get_rank(
            "www.centresource.com",
            "web design nashville",
            "2011-01-01",
            "2011-01-31",
            "all",
        )
        .unwrap();
    let by_engine = response.into_json().unwrap();
    let by_engine = by_engine.as_object().unwrap();
    assert!(!by_engine.is_empty());
    for (engine, entries) in by_engine {
        let entries = entries.as_array().unwrap_or_else(|| panic!("{engine} should map to a list"));
        for entry in entries {
            assert!(entry.get("date").is_some(), "{engine} entry without date");
            assert!(entry.get("status").is_some(), "{engine} entry without status");
        }
    }
}

#[test]
fn all_keyword_rank_nests_keyword_then_engine() {
    let client = fixture_client(Format::Json);
    let response = client
        .get_rank_all("www.centresource.com", "2011-01-01", Some("2011-01-31"))
        .unwrap();
    let by_keyword = response.into_json().unwrap();
    let by_keyword = by_keyword.as_object().unwrap();
    assert!(by_keyword.contains_key("web design nashville"));
    for engines in by_keyword.values() {
        assert!(engines.is_object());
    }
}

#[test]
fn rank_max_week_names_the_week() {
    let client = fixture_client(Format::Json);
    let response = client
        .get_rank_max_week("www.centresource.com", Some("web design nashville"))
        .unwrap();
    let best = response.into_json().unwrap();
    assert!(best.get("keyword").is_some());
    assert!(best.get("domain").is_some());
    assert!(best.get("date").is_some());
}

#[test]
fn competitors_are_plain_strings() {
    let client = fixture_client(Format::Json);
    let response = client.list_competitors("www.centresource.com").unwrap();
    let competitors = response.into_json().unwrap();
    assert!(competitors.as_array().unwrap().iter().all(|c| c.is_string()));
}

#[test]
fn keyword_listings_decode_both_shapes() {
    let client = fixture_client(Format::Json);

    let response = client.list_keywords("www.centresource.com").unwrap();
    let keywords = response.into_json().unwrap();
    assert!(keywords.as_array().unwrap().iter().all(|k| k.is_string()));

    let response = client.list_keywords_with_tags("www.centresource.com").unwrap();
    let tagged = response.into_json().unwrap();
    for entry in tagged.as_array().unwrap() {
        assert!(entry.get("keyword").is_some());
        assert!(entry["tags"].is_array());
    }
}

#[test]
fn profile_mutations_report_success() {
    let client = fixture_client(Format::Json);

    let added = client.add_domain("www.example.com", &[1, 2]).unwrap();
    assert_eq!(added.as_json().unwrap()["response"], "success");

    let removed = client.remove_domain("www.example.com").unwrap();
    assert_eq!(removed.as_json().unwrap()["response"], "success");

    let added = client.add_keyword("www.example.com", "new keyword").unwrap();
    assert_eq!(added.as_json().unwrap()["response"], "success");

    let removed = client.remove_keyword("www.example.com", "new keyword").unwrap();
    assert_eq!(removed.as_json().unwrap()["response"], "success");
}

#[test]
fn links_listing_decodes_into_link_records() {
    let client = fixture_client(Format::Json);
    let response = client.list_links("www.centresource.com", None).unwrap();
    let value = response.into_json().unwrap();

    // The listing shape matches the native record type.
    let links: Vec<Link> = serde_json::from_value(value).unwrap();
    assert!(!links.is_empty());
    assert_eq!(links[0].link_id, Some(101));
    assert_eq!(links[0].link_text.as_deref(), Some("Nashville web design"));
}

#[test]
fn link_mutations_map_remote_ids_to_outcomes() {
    let client = fixture_client(Format::Json);

    let batch = vec![Link {
        link_text: Some("Nashville web design".into()),
        link_url: Some("http://www.centresource.com/".into()),
        website_url: Some("http://partner-blog.example/".into()),
        website_type_id: Some(1),
        link_type_id: Some(2),
        status: Some("requested".into()),
        ..Link::default()
    }];
    let created = client.add_links("www.centresource.com", batch).unwrap();
    let receipts = created.into_json().unwrap();
    let receipts = receipts.as_object().unwrap();
    assert!(receipts.values().all(|outcome| *outcome == "success"));

    let updated = client
        .update_links(
            "www.centresource.com",
            vec![Link {
                link_id: Some(101),
                status: Some("active".into()),
                ..Link::default()
            }],
        )
        .unwrap();
    assert_eq!(updated.as_json().unwrap()["101"], "success");

    let deleted = client
        .delete_links(
            "www.centresource.com",
            vec![Link {
                link_id: Some(102),
                ..Link::default()
            }],
        )
        .unwrap();
    assert_eq!(deleted.as_json().unwrap()["102"], "success");
}

#[test]
fn type_catalogs_list_id_and_type() {
    let client = fixture_client(Format::Json);

    for response in [
        client.list_website_types().unwrap(),
        client.list_link_types().unwrap(),
    ] {
        let catalog = response.into_json().unwrap();
        for entry in catalog.as_array().unwrap() {
            assert!(entry.get("id").is_some());
            assert!(entry.get("type").is_some());
        }
    }
}

#[test]
fn raw_call_surfaces_return_wire_bodies() {
    let client = fixture_client(Format::Json);

    let body = client.call_json("domains", Params::new()).unwrap();
    assert_eq!(body, fixture("domains.json"));

    let body = client.call_xml("domains", Params::new()).unwrap();
    assert!(body.contains("<Raven>"));
}

#[test]
fn generic_call_matches_the_typed_method() {
    let client = fixture_client(Format::Json);

    let typed = client.list_keywords("www.centresource.com").unwrap();
    let generic = client
        .call("keywords", Params::new().set("domain", "www.centresource.com"))
        .unwrap();
    assert_eq!(typed, generic);
}

#[test]
fn unfixtured_methods_replay_as_empty_responses() {
    // profile_info has no XML fixture, so the replay is an empty body.
    let client = fixture_client(Format::Xml);
    let err = client.get_profile_info().unwrap_err();
    assert!(matches!(err, Error::EmptyResponse));
}

#[test]
fn validate_key_accepts_the_fixture_profile() {
    // Runs through the injected transport, not the live service.
    let client = fixture_client(Format::Xml);
    assert!(client.validate_key());
}
