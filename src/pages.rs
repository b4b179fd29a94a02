//! Minimal HTML pages for the home listing and per-location lookup view.
//!
//! Styling and client-side behavior live with the presentation layer; these
//! pages only carry the data it needs (tenant links, the tenant identifier
//! and display name).

use crate::models::TenantRecord;

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Home page listing every enabled location.
pub fn home_page(tenants: &[TenantRecord]) -> String {
    let items: Vec<String> = tenants
        .iter()
        .map(|t| {
            format!(
                "<li><a href=\"/{}\">{}</a></li>",
                escape_html(&t.identifier),
                escape_html(&t.display_name)
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Member Referral Lookup</title>
</head>
<body>
  <h1>DAY ONE / REFERRAL MEMBER LOOKUP</h1>
  <p>Select your location:</p>
  <ul>
{}
  </ul>
</body>
</html>
"#,
        items.join("\n")
    )
}

/// Client script for the location page.
///
/// Loads `/api/{id}/config` once, searches as the user types and opens the
/// configured forms with the selected contact's fields pre-filled. The
/// location id is read from `<body data-location>`, so nothing is
/// interpolated into script text.
const LOCATION_SCRIPT: &str = r#"
(function () {
  var base = '/api/' + encodeURIComponent(document.body.dataset.location);
  var config = { referralFormUrl: '', dayOneFormUrl: '', manualEntryUrl: '' };
  var selected = null;
  var timer;
  var input = document.getElementById('query');
  var results = document.getElementById('results');
  var member = document.getElementById('member');

  fetch(base + '/config')
    .then(function (res) { return res.json(); })
    .then(function (c) { config = c; });

  function text(tag, value) {
    var el = document.createElement(tag);
    el.textContent = value;
    return el;
  }

  function formUrl(url, contact) {
    if (!url) { return null; }
    var params = new URLSearchParams();
    if (contact.firstName) { params.set('first_name', contact.firstName); }
    if (contact.lastName) { params.set('last_name', contact.lastName); }
    if (contact.email) { params.set('email', contact.email); }
    if (contact.phone) { params.set('phone', contact.phone); }
    return url + '?' + params.toString();
  }

  function open(url) {
    if (url) { window.open(url, '_blank'); } else { alert('Form not configured for this location'); }
  }

  function select(contact) {
    selected = contact;
    member.replaceChildren(text('strong', contact.name || 'No Name'), text('p', contact.email), text('p', contact.phone));
    results.replaceChildren();
    input.value = '';
  }

  input.addEventListener('input', function () {
    clearTimeout(timer);
    var q = input.value.trim();
    if (q.length < 2) { results.replaceChildren(); return; }
    timer = setTimeout(function () {
      fetch(base + '/search?query=' + encodeURIComponent(q))
        .then(function (res) { return res.json(); })
        .then(function (data) {
          results.replaceChildren.apply(results, (data.contacts || []).map(function (c) {
            var li = text('li', c.name || 'No Name');
            li.addEventListener('click', function () { select(c); });
            return li;
          }));
        });
    }, 300);
  });

  document.getElementById('referral').addEventListener('click', function () {
    if (selected) { open(formUrl(config.referralFormUrl, selected)); }
  });
  document.getElementById('day-one').addEventListener('click', function () {
    if (selected) { open(formUrl(config.dayOneFormUrl, selected)); }
  });
  document.getElementById('manual').addEventListener('click', function () {
    open(config.manualEntryUrl);
  });
})();
"#;

/// Lookup page for one location.
pub fn location_page(tenant: &TenantRecord) -> String {
    let identifier = escape_html(&tenant.identifier);
    let name = escape_html(&tenant.display_name);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Member Referral Lookup - {name}</title>
</head>
<body data-location="{identifier}">
  <h1>{name}</h1>
  <p>Search for a member to start a referral or day one form.</p>
  <input id="query" type="search" placeholder="Name, email, or phone" autocomplete="off">
  <ul id="results"></ul>
  <div id="member"></div>
  <button id="referral" type="button">Referral form</button>
  <button id="day-one" type="button">Day one form</button>
  <button id="manual" type="button">Manual entry</button>
  <script>{script}</script>
</body>
</html>
"#,
        script = LOCATION_SCRIPT
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Secret;

    fn tenant(identifier: &str, name: &str) -> TenantRecord {
        TenantRecord {
            identifier: identifier.to_string(),
            display_name: name.to_string(),
            upstream_location_id: "loc_1".to_string(),
            upstream_api_key: Secret::new("pit-1"),
            referral_form_url: None,
            day_one_form_url: None,
            manual_entry_url: None,
            enabled: true,
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_home_page_links_each_tenant() {
        let html = home_page(&[tenant("downtown", "Downtown"), tenant("uptown", "Up & Town")]);
        assert!(html.contains(r#"<a href="/downtown">Downtown</a>"#));
        assert!(html.contains(r#"<a href="/uptown">Up &amp; Town</a>"#));
    }

    #[test]
    fn test_location_page_never_contains_secrets() {
        let html = location_page(&tenant("downtown", "Downtown"));
        assert!(html.contains(r#"data-location="downtown""#));
        assert!(!html.contains("pit-1"));
        assert!(!html.contains("loc_1"));
    }

    #[test]
    fn test_location_page_loads_config_and_prefills_forms() {
        let html = location_page(&tenant("downtown", "Downtown"));
        assert!(html.contains("base + '/config'"));
        assert!(html.contains("base + '/search?query='"));
        for field in ["first_name", "last_name", "email", "phone"] {
            assert!(html.contains(&format!("params.set('{}'", field)), "{}", field);
        }
    }

    #[test]
    fn test_location_identifier_is_attribute_escaped() {
        let html = location_page(&tenant("a\"b", "X"));
        assert!(html.contains(r#"data-location="a&quot;b""#));
    }
}
