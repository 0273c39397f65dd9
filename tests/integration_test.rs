use marktplatz_scraper::{config::ScraperConfig, crawler::Crawler, report::ReportBuilder};
use mockito::{Matcher, Mock, Server, ServerGuard};
use std::time::{Duration, Instant};

const OVERVIEW_PATH: &str = "/forums/angebote.11/";

fn test_config(server: &Server, max_results: usize) -> ScraperConfig {
    ScraperConfig {
        base_url: server.url(),
        start_url: format!("{}{}", server.url(), OVERVIEW_PATH),
        max_results,
        request_delay_ms: 0,
        ..ScraperConfig::default()
    }
}

fn overview_page(titles: &[(&str, &str)]) -> String {
    let items = titles
        .iter()
        .map(|(title, href)| {
            format!(
                r#"<div class="structItem structItem--thread">
                    <div class="structItem-title"><a href="{}" data-tp-primary="on">{}</a></div>
                </div>"#,
                href, title
            )
        })
        .collect::<String>();

    format!("<html><body><div class=\"structItemContainer\">{}</div></body></html>", items)
}

fn thread_page(body: &str) -> String {
    format!(
        r#"<html><body><article class="message-body"><div class="bbWrapper">{}</div></article></body></html>"#,
        body
    )
}

async fn html_mock(server: &mut ServerGuard, path: &str, html: &str) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(html)
        .create_async()
        .await
}

#[tokio::test]
async fn test_full_crawl_workflow() {
    let mut server = Server::new_async().await;

    html_mock(
        &mut server,
        OVERVIEW_PATH,
        &overview_page(&[
            ("[Verkauf] Rolex Submariner", "/threads/rolex.1/"),
            ("[Suche] Omega Seamaster", "/threads/omega.2/"),
            ("[VERKAUF] Tudor Black Bay", "/threads/tudor.3/"),
            ("[Verkauf-Tausch] Seiko SKX", "/threads/seiko.4/"),
        ]),
    )
    .await;
    html_mock(
        &mut server,
        "/forums/angebote.11/page-2",
        &overview_page(&[("[Verkauf] Sinn 556", "/threads/sinn.5/")]),
    )
    .await;
    html_mock(&mut server, "/forums/angebote.11/page-3", &overview_page(&[])).await;

    html_mock(
        &mut server,
        "/threads/rolex.1/",
        &thread_page(
            r#"Preis: 1.200,50 € oder 1.300,00 EUR
               <img class="bbImage" src="/attachments/1.jpg">
               <img class="bbImage" src="/attachments/2.jpg">
               <img class="bbImage" src="/attachments/3.jpg">
               <img class="bbImage" src="/attachments/4.jpg">"#,
        ),
    )
    .await;
    html_mock(&mut server, "/threads/seiko.4/", &thread_page("Nur Tausch")).await;
    html_mock(
        &mut server,
        "/threads/sinn.5/",
        &thread_page(r#"VB 950 Euro <img class="bbImage" data-url="https://cdn.example.com/sinn.jpg">"#),
    )
    .await;
    let rejected = server
        .mock("GET", Matcher::Regex(r"^/threads/(omega|tudor)".to_string()))
        .expect(0)
        .create_async()
        .await;

    let crawler = Crawler::new(test_config(&server, 100)).unwrap();
    let records = crawler.run().await;

    let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["[Verkauf] Rolex Submariner", "[Verkauf-Tausch] Seiko SKX", "[Verkauf] Sinn 556"]
    );

    let rolex = &records[0];
    assert_eq!(rolex.price, Some(1300.0));
    assert_eq!(rolex.images.len(), 3);
    assert_eq!(rolex.images[0], format!("{}/attachments/1.jpg", server.url()));
    assert_eq!(rolex.link, format!("{}/threads/rolex.1/", server.url()));

    assert_eq!(records[1].price, None);
    assert!(records[1].images.is_empty());

    assert_eq!(records[2].price, Some(950.0));
    assert_eq!(records[2].images, vec!["https://cdn.example.com/sinn.jpg"]);

    rejected.assert_async().await;
}

#[tokio::test]
async fn test_crawl_stops_at_max_results() {
    let mut server = Server::new_async().await;

    html_mock(
        &mut server,
        OVERVIEW_PATH,
        &overview_page(&[
            ("[Verkauf] One", "/threads/one.1/"),
            ("[Verkauf] Two", "/threads/two.2/"),
            ("[Verkauf] Three", "/threads/three.3/"),
        ]),
    )
    .await;
    html_mock(&mut server, "/threads/one.1/", &thread_page("100 €")).await;
    html_mock(&mut server, "/threads/two.2/", &thread_page("200 €")).await;
    let third = server
        .mock("GET", "/threads/three.3/")
        .expect(0)
        .create_async()
        .await;
    let next_page = server
        .mock("GET", "/forums/angebote.11/page-2")
        .expect(0)
        .create_async()
        .await;

    let crawler = Crawler::new(test_config(&server, 2)).unwrap();
    let records = crawler.run().await;

    assert_eq!(records.len(), 2);
    assert_eq!(records[1].price, Some(200.0));
    third.assert_async().await;
    next_page.assert_async().await;
}

#[tokio::test]
async fn test_failed_thread_fetch_still_records_listing() {
    let mut server = Server::new_async().await;

    html_mock(
        &mut server,
        OVERVIEW_PATH,
        &overview_page(&[("[Verkauf] Broken", "/threads/broken.1/")]),
    )
    .await;
    server
        .mock("GET", "/threads/broken.1/")
        .with_status(503)
        .create_async()
        .await;
    server
        .mock("GET", "/forums/angebote.11/page-2")
        .with_status(404)
        .create_async()
        .await;

    let crawler = Crawler::new(test_config(&server, 10)).unwrap();
    let records = crawler.run().await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].price, None);
    assert!(records[0].images.is_empty());
}

#[tokio::test]
async fn test_failed_overview_writes_no_report() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", OVERVIEW_PATH)
        .with_status(500)
        .create_async()
        .await;

    let crawler = Crawler::new(test_config(&server, 10)).unwrap();
    let records = crawler.run().await;
    assert!(records.is_empty());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("angebote.html");
    let written = ReportBuilder::new(records).save(&path).await.unwrap();

    assert!(!written);
    assert!(!path.exists());
}

#[tokio::test]
async fn test_report_from_crawl() {
    let mut server = Server::new_async().await;

    html_mock(
        &mut server,
        OVERVIEW_PATH,
        &overview_page(&[
            ("[Verkauf] Rolex", "/threads/rolex.1/"),
            ("[Verkauf] Seiko", "/threads/seiko.2/"),
        ]),
    )
    .await;
    html_mock(
        &mut server,
        "/threads/rolex.1/",
        &thread_page(r#"7.450 € <img class="bbImage" src="/a.jpg"><img class="bbImage" src="/b.jpg">"#),
    )
    .await;
    html_mock(&mut server, "/threads/seiko.2/", &thread_page("Preis auf Anfrage")).await;
    html_mock(&mut server, "/forums/angebote.11/page-2", &overview_page(&[])).await;

    let crawler = Crawler::new(test_config(&server, 10)).unwrap();
    let records = crawler.run().await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("angebote.html");
    let written = ReportBuilder::new(records).save(&path).await.unwrap();
    assert!(written);

    let html = std::fs::read_to_string(&path).unwrap();
    assert!(html.contains("Gefundene Verkaufsanzeigen (2)"));
    assert_eq!(html.matches("<tr>").count(), 2);
    assert_eq!(html.matches(r#"width="120""#).count(), 2);
    assert!(html.contains("<td>7450.00</td>"));
    assert!(html.contains("Keine Bilder"));
}

#[tokio::test]
async fn test_rate_limiting() {
    let mut server = Server::new_async().await;

    html_mock(
        &mut server,
        OVERVIEW_PATH,
        &overview_page(&[("[Verkauf] Rolex", "/threads/rolex.1/")]),
    )
    .await;
    html_mock(&mut server, "/threads/rolex.1/", &thread_page("5.000 €")).await;
    server
        .mock("GET", "/forums/angebote.11/page-2")
        .with_status(404)
        .create_async()
        .await;

    let config = ScraperConfig {
        request_delay_ms: 200,
        ..test_config(&server, 10)
    };
    let crawler = Crawler::new(config).unwrap();

    let start = Instant::now();
    let records = crawler.run().await;
    let elapsed = start.elapsed();

    // overview page, thread page, failing second overview page
    assert_eq!(records.len(), 1);
    assert!(
        elapsed >= Duration::from_millis(600),
        "Rate limiting should space out requests"
    );
}
