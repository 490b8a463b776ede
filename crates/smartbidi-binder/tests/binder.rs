use std::time::Duration;

use anyhow::{Context, Result};
use ego_tree::NodeId;
use pretty_assertions::assert_eq;
use scraper::Selector;
use smartbidi_binder::{BinderConfig, Capabilities, ClassNames, HostPage, InputBinder};
use smartbidi_config::SmartBidiConfig;

const PAGE: &str = r#"<!DOCTYPE html>
<html><body>
    <input id="name" type="text" value="שלום">
    <input id="mail" type="email">
    <input id="pw" type="password">
    <textarea id="notes"></textarea>
    <div id="rich" contenteditable="true"></div>
    <div id="static">Hello</div>
</body></html>"#;

fn by_id(page: &HostPage, id: &str) -> Result<NodeId> {
    let selector = Selector::parse(&format!("#{id}")).map_err(|e| anyhow::anyhow!("{e}"))?;
    let doc = page.document();
    doc.select(doc.root(), &selector)
        .first()
        .copied()
        .with_context(|| format!("no element #{id}"))
}

fn attached(capabilities: Capabilities) -> (HostPage, InputBinder) {
    let mut page = HostPage::from_html(PAGE, capabilities);
    let mut binder = InputBinder::default();
    binder.attach(&mut page);
    (page, binder)
}

fn type_into(page: &mut HostPage, binder: &mut InputBinder, node: NodeId, text: &str) {
    assert!(page.type_text(node, text));
    page.pump(binder);
}

#[test]
fn binds_every_editable_kind() -> Result<()> {
    let (page, binder) = attached(Capabilities::all());
    assert_eq!(binder.bound_count(), 4);
    for id in ["name", "mail", "notes", "rich"] {
        let node = by_id(&page, id)?;
        assert!(page.document().is_bound(node), "{id}");
        assert_eq!(page.listener_count(node), 1, "{id}");
    }
    for id in ["pw", "static"] {
        assert!(!page.document().is_bound(by_id(&page, id)?), "{id}");
    }
    assert!(binder.is_observing_mutations());
    assert!(binder.is_subscribed_to_store());
    Ok(())
}

#[test]
fn binding_alone_leaves_direction_untouched() -> Result<()> {
    let (page, _binder) = attached(Capabilities::all());
    let name = by_id(&page, "name")?;
    assert_eq!(page.document().dir(name), None);
    assert!(page.document().classes(name).is_empty());
    Ok(())
}

#[test]
fn typing_switches_direction_and_classes() -> Result<()> {
    let (mut page, mut binder) = attached(Capabilities::all());
    let name = by_id(&page, "name")?;

    type_into(&mut page, &mut binder, name, "Hello שלום");
    assert_eq!(page.document().dir(name), Some("auto"));
    assert_eq!(page.document().classes(name), vec!["bidi-mixed"]);

    type_into(&mut page, &mut binder, name, "שלום");
    assert_eq!(page.document().dir(name), Some("rtl"));
    assert_eq!(page.document().classes(name), vec!["rtl-only"]);

    type_into(&mut page, &mut binder, name, "Hello");
    assert_eq!(page.document().dir(name), Some("ltr"));
    assert!(page.document().classes(name).is_empty());
    Ok(())
}

#[test]
fn contenteditable_and_textarea_follow_typing() -> Result<()> {
    let (mut page, mut binder) = attached(Capabilities::all());
    let rich = by_id(&page, "rich")?;
    let notes = by_id(&page, "notes")?;

    type_into(&mut page, &mut binder, rich, "טקסט");
    type_into(&mut page, &mut binder, notes, "notes עם text");
    assert_eq!(page.document().dir(rich), Some("rtl"));
    assert!(page.document().has_class(rich, "rtl-only"));
    assert_eq!(page.document().dir(notes), Some("auto"));
    assert!(page.document().has_class(notes, "bidi-mixed"));
    Ok(())
}

#[test]
fn arabic_is_neutral_under_the_hebrew_range() -> Result<()> {
    let (mut page, mut binder) = attached(Capabilities::all());
    let name = by_id(&page, "name")?;
    type_into(&mut page, &mut binder, name, "مرحبا World");
    assert_eq!(page.document().dir(name), Some("ltr"));
    assert!(page.document().classes(name).is_empty());
    Ok(())
}

#[test]
fn rescanning_never_binds_twice() -> Result<()> {
    let (mut page, mut binder) = attached(Capabilities::all());
    let root = page.document().root();
    assert_eq!(binder.scan(&mut page, root), 0);

    page.notify_store_change();
    page.advance(Duration::from_secs(1), &mut binder);
    assert_eq!(binder.rescan_count(), 1);
    assert_eq!(binder.bound_count(), 4);

    let name = by_id(&page, "name")?;
    assert_eq!(page.listener_count(name), 1);
    Ok(())
}

#[test]
fn observed_insertions_are_bound() -> Result<()> {
    let (mut page, mut binder) = attached(Capabilities::all());
    let body = page.document().body().context("body")?;

    page.insert_html(body, r#"<form><input id="url" type="url"></form>"#);
    page.insert_html(body, r#"<input id="bare" type="text">"#);
    page.pump(&mut binder);
    assert_eq!(binder.bound_count(), 6);
    assert_eq!(binder.rescan_count(), 0);

    let url = by_id(&page, "url")?;
    type_into(&mut page, &mut binder, url, "שלום");
    assert_eq!(page.document().dir(url), Some("rtl"));

    let bare = by_id(&page, "bare")?;
    assert!(page.document().is_bound(bare));
    Ok(())
}

#[test]
fn store_rescan_covers_missing_observer() -> Result<()> {
    let (mut page, mut binder) = attached(Capabilities {
        mutation_observer: false,
        editor_store: true,
    });
    assert!(!binder.is_observing_mutations());

    let body = page.document().body().context("body")?;
    page.insert_html(body, r#"<textarea id="late"></textarea>"#);
    page.pump(&mut binder);
    let late = by_id(&page, "late")?;
    assert!(!page.document().is_bound(late));

    page.notify_store_change();
    page.advance(Duration::from_millis(300), &mut binder);
    assert!(page.document().is_bound(late));
    assert_eq!(binder.bound_count(), 5);
    Ok(())
}

#[test]
fn store_changes_are_debounced() {
    let (mut page, mut binder) = attached(Capabilities::all());

    page.notify_store_change();
    page.pump(&mut binder);
    assert!(binder.has_pending_rescan());

    page.advance(Duration::from_millis(100), &mut binder);
    page.notify_store_change();
    page.pump(&mut binder);
    assert_eq!(page.pending_timers(), 1);

    page.advance(Duration::from_millis(199), &mut binder);
    assert_eq!(binder.rescan_count(), 0);

    page.advance(Duration::from_millis(1), &mut binder);
    assert_eq!(page.now(), Duration::from_millis(300));
    assert_eq!(binder.rescan_count(), 1);
    assert!(!binder.has_pending_rescan());

    page.advance(Duration::from_secs(5), &mut binder);
    assert_eq!(binder.rescan_count(), 1);

    // A later burst arms a fresh window.
    page.notify_store_change();
    page.pump(&mut binder);
    assert!(binder.has_pending_rescan());
    page.advance(Duration::from_millis(299), &mut binder);
    assert_eq!(binder.rescan_count(), 1);
    page.advance(Duration::from_millis(1), &mut binder);
    assert_eq!(binder.rescan_count(), 2);
    assert_eq!(page.pending_timers(), 0);
}

#[test]
fn no_store_means_no_rescans() {
    let (mut page, mut binder) = attached(Capabilities {
        mutation_observer: true,
        editor_store: false,
    });
    assert!(!binder.is_subscribed_to_store());
    page.notify_store_change();
    assert_eq!(page.advance(Duration::from_secs(1), &mut binder), 0);
    assert_eq!(binder.rescan_count(), 0);
    assert_eq!(binder.bound_count(), 4);
}

#[test]
fn bare_page_still_binds() {
    let (_page, binder) = attached(Capabilities::none());
    assert_eq!(binder.bound_count(), 4);
    assert!(!binder.is_observing_mutations());
    assert!(!binder.is_subscribed_to_store());
}

#[test]
fn removed_elements_drop_their_binding() -> Result<()> {
    let (mut page, mut binder) = attached(Capabilities::all());
    let name = by_id(&page, "name")?;
    assert!(page.remove(name));
    page.pump(&mut binder);
    assert_eq!(binder.bound_count(), 3);
    assert!(!page.type_text(name, "Hello"));
    Ok(())
}

#[test]
fn detach_disposes_registrations() -> Result<()> {
    let (mut page, mut binder) = attached(Capabilities::all());
    page.notify_store_change();
    page.pump(&mut binder);
    assert_eq!(page.pending_timers(), 1);

    binder.detach(&mut page);
    assert_eq!(binder.bound_count(), 0);
    assert_eq!(page.pending_timers(), 0);
    assert_eq!(page.store_subscriber_count(), 0);

    let name = by_id(&page, "name")?;
    assert_eq!(page.listener_count(name), 0);
    assert!(!page.document().is_bound(name));

    assert!(page.type_text(name, "Hello שלום"));
    page.advance(Duration::from_secs(1), &mut binder);
    assert_eq!(page.document().dir(name), None);
    assert_eq!(binder.rescan_count(), 0);

    assert_eq!(binder.attach(&mut page), 4);
    Ok(())
}

#[test]
fn legacy_class_names() -> Result<()> {
    let mut settings = SmartBidiConfig::default();
    settings.binder.legacy_class_names = true;
    let mut page = HostPage::from_html(PAGE, Capabilities::all());
    let mut binder = InputBinder::new(BinderConfig::from(&settings));
    assert_eq!(binder.config().classes, ClassNames::LEGACY);
    binder.attach(&mut page);

    let name = by_id(&page, "name")?;
    type_into(&mut page, &mut binder, name, "Hello שלום");
    assert_eq!(page.document().classes(name), vec!["hebrew-latin-mixed"]);
    type_into(&mut page, &mut binder, name, "שלום");
    assert_eq!(page.document().classes(name), vec!["hebrew-only"]);
    Ok(())
}
