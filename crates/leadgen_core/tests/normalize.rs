use leadgen_core::normalize_record;
use serde_json::json;

#[test]
fn degenerate_shapes_never_panic() {
    for record in [
        json!(null),
        json!("just a string"),
        json!(42),
        json!([1, 2, 3]),
        json!({}),
        json!({ "site": null, "linkedin": null }),
        json!({ "site": "not an object", "emails": { "nested": true } }),
        json!({ "title": null, "url": 12, "phones": false }),
    ] {
        let row = normalize_record(&record);
        assert_eq!(row.company, "");
        assert_eq!(row.emails, "");
        assert_eq!(row.phones, "");
    }
}

#[test]
fn title_takes_precedence_over_site_company_name() {
    let record = json!({
        "title": "Acme Corp",
        "site": { "company_name": "Acme Ltd" }
    });
    assert_eq!(normalize_record(&record).company, "Acme Corp");
}

#[test]
fn company_falls_back_through_the_chain() {
    let record = json!({ "site": { "companyName": "Globex" } });
    assert_eq!(normalize_record(&record).company, "Globex");

    let record = json!({ "name": "Initech" });
    assert_eq!(normalize_record(&record).company, "Initech");

    // Empty strings do not win the chain.
    let record = json!({ "title": "", "url": "https://hooli.example.com" });
    assert_eq!(normalize_record(&record).company, "https://hooli.example.com");
}

#[test]
fn url_falls_back_to_site_then_link_then_website() {
    let record = json!({ "site": { "url": "https://a.example.com" } });
    assert_eq!(normalize_record(&record).url, "https://a.example.com");

    let record = json!({ "website": "https://b.example.com" });
    assert_eq!(normalize_record(&record).url, "https://b.example.com");
}

#[test]
fn delimited_email_string_is_split_and_rejoined() {
    let record = json!({ "emails": "a@x.com; b@y.com" });
    assert_eq!(normalize_record(&record).emails, "a@x.com, b@y.com");

    let record = json!({ "emails": "a@x.com,b@y.com , c@z.com" });
    assert_eq!(normalize_record(&record).emails, "a@x.com, b@y.com, c@z.com");
}

#[test]
fn email_array_takes_precedence_over_delimited_string() {
    let record = json!({
        "site": { "emails": ["sales@acme.com", "", "info@acme.com"] },
        "emails": "ignored@acme.com"
    });
    assert_eq!(normalize_record(&record).emails, "sales@acme.com, info@acme.com");
}

#[test]
fn empty_email_array_still_wins_the_chain() {
    let record = json!({
        "site": { "emails": [] },
        "emails": ["fallback@acme.com"]
    });
    assert_eq!(normalize_record(&record).emails, "");
}

#[test]
fn phones_fall_back_to_singular_fields_and_coerce_numbers() {
    let record = json!({ "site": { "phone": 5551234 } });
    assert_eq!(normalize_record(&record).phones, "5551234");

    let record = json!({ "phone": "+47 555 1234" });
    assert_eq!(normalize_record(&record).phones, "+47 555 1234");

    let record = json!({ "phones": ["111", "222"], "phone": "333" });
    assert_eq!(normalize_record(&record).phones, "111, 222");
}

#[test]
fn ceo_prefers_linkedin_over_flat_and_site_fields() {
    let record = json!({
        "linkedin": { "ceo": "Ada" },
        "ceo": "Grace",
        "site": { "ceo": "Edsger" }
    });
    assert_eq!(normalize_record(&record).ceo, "Ada");

    let record = json!({ "site": { "ceo": "Edsger" } });
    assert_eq!(normalize_record(&record).ceo, "Edsger");
}

#[test]
fn linkedin_profile_tries_company_url_last() {
    let record = json!({
        "linkedin": { "company": { "url": "https://linkedin.example.com/company/acme" } }
    });
    assert_eq!(
        normalize_record(&record).linkedin_profile,
        "https://linkedin.example.com/company/acme"
    );

    let record = json!({
        "site": { "linkedin_page": "https://linkedin.example.com/in/ada" },
        "linkedin": { "company": { "url": "https://linkedin.example.com/company/acme" } }
    });
    assert_eq!(
        normalize_record(&record).linkedin_profile,
        "https://linkedin.example.com/in/ada"
    );
}
