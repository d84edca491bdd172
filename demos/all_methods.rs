//! Walks the whole method catalog against a live profile.
//!
//! Run with: RAVEN_API_KEY=your-key cargo run --example all_methods

use colored::Colorize;
use raventools::{ApiResponse, Client, Result};
use serde_json::Value;

// Configuration - Set via environment variables
fn get_api_key() -> String {
    std::env::var("RAVEN_API_KEY").expect("RAVEN_API_KEY environment variable is required")
}
fn get_endpoint() -> String {
    std::env::var("RAVEN_ENDPOINT").unwrap_or_else(|_| "https://api.raventools.com/api".into())
}

// Profile data the walkthrough runs against - adjust to your account.
const DOMAIN: &str = "www.example.com";
const KEYWORD: &str = "example keyword";
const START_DATE: &str = "2011-01-01";
const END_DATE: &str = "2011-01-31";
const SCRATCH_DOMAIN: &str = "www.scratch-example.com";
const SCRATCH_KEYWORD: &str = "scratch keyword";

fn header(text: &str) {
    println!();
    println!("{}", format!(" {} ", text).on_blue().bold());
    println!();
}

fn info(label: &str, value: &str) {
    println!("  {}: {}", label.dimmed(), value);
}

fn print_json(value: &Value) {
    let formatted = serde_json::to_string_pretty(value).unwrap_or_default();
    println!("{}", formatted.dimmed());
}

/// Print one call's request URL and outcome, and keep walking on error.
fn report(client: &Client, name: &str, result: Result<ApiResponse>) {
    if let Some(url) = client.last_request_url() {
        println!("  {} {}", "request:".dimmed(), url.dimmed());
    }
    match result {
        Ok(response) => {
            println!("{} {}", "✔".green(), name);
            match response {
                ApiResponse::Json(value) => print_json(&value),
                ApiResponse::Xml(doc) => {
                    println!("{}", format!("<{}> document", doc.root().name()).dimmed())
                }
            }
        }
        Err(err) => println!("{} {}: {}", "✖".red(), name, err),
    }
}

fn main() -> Result<()> {
    let api_key = get_api_key();
    let endpoint = get_endpoint();

    header("Configuration");
    info("Endpoint", &endpoint);
    info(
        "API Key",
        &format!("{}...", &api_key[..api_key.len().min(6)]),
    );
    info("Format", "json");

    if Client::validate_api_key(api_key.clone()) {
        println!("{} API key validated", "✔".green());
    } else {
        println!("{} API key failed validation, continuing anyway", "⚠".yellow());
    }

    let client = Client::builder(api_key).endpoint(endpoint).build()?;

    header("Profile");
    report(&client, "profile_info", client.get_profile_info());

    header("Domains");
    report(&client, "domains", client.list_domains());
    report(&client, "domain_info", client.get_domain_info(DOMAIN));
    report(
        &client,
        "add_domain",
        client.add_domain(SCRATCH_DOMAIN, &[1, 2]),
    );
    report(&client, "remove_domain", client.remove_domain(SCRATCH_DOMAIN));

    header("Engines");
    report(&client, "engines", client.list_engines());

    header("Rankings");
    report(
        &client,
        "rank",
        client.get_rank(DOMAIN, KEYWORD, START_DATE, END_DATE, "all"),
    );
    report(
        &client,
        "rank_all",
        client.get_rank_all(DOMAIN, START_DATE, Some(END_DATE)),
    );
    report(
        &client,
        "rank_max_week",
        client.get_rank_max_week(DOMAIN, Some(KEYWORD)),
    );

    header("Competitors & Keywords");
    report(&client, "competitors", client.list_competitors(DOMAIN));
    report(&client, "keywords", client.list_keywords(DOMAIN));
    report(&client, "keywords_tags", client.list_keywords_with_tags(DOMAIN));
    report(&client, "add_keyword", client.add_keyword(DOMAIN, SCRATCH_KEYWORD));
    report(
        &client,
        "remove_keyword",
        client.remove_keyword(DOMAIN, SCRATCH_KEYWORD),
    );

    header("Link Manager");
    report(&client, "get_links", client.list_links(DOMAIN, None));
    report(&client, "get_website_types", client.list_website_types());
    report(&client, "get_link_types", client.list_link_types());

    println!();
    println!("{}", "Catalog walk complete.".bold());
    Ok(())
}
