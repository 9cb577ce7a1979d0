//! End-to-end hover scenarios over a small in-memory map.

use addrmap_core::{
    AnnotationService, Descriptor, DescriptorRepository, MapKind, Normalizer, Renderer,
};

fn service(maps: Vec<(MapKind, Vec<Descriptor>)>) -> AnnotationService {
    let repo = DescriptorRepository::build(maps, &Normalizer::default());
    AnnotationService::new(repo, Renderer::default(), 3000)
}

fn cursor_in(line: &str, needle: &str) -> usize {
    line.find(needle).expect("needle present") + 1
}

#[test]
fn indexed_low_ram_resolves_to_ram_bank() {
    let line = "LDA $0010,x";
    for address in ["$0000", "$7E0000"] {
        let svc = service(vec![(
            MapKind::Ram,
            vec![Descriptor::new(address, 8192, "Low RAM")],
        )]);
        let text = svc.resolve_hover(line, cursor_in(line, "$0010")).unwrap();
        assert_eq!(text, "Low RAM  \nStarts at $7E0000 and ends at $7E1FFF.");
    }
}

#[test]
fn two_hijacks_without_rom_descriptor() {
    let svc = service(vec![(
        MapKind::Hijacks,
        vec![
            Descriptor::new("$00C000", 4, "Hijack one"),
            Descriptor::new("$00C000", 16, "Hijack two"),
        ],
    )]);
    let line = "JML $00C002";
    let text = svc.resolve_hover(line, cursor_in(line, "$00C002")).unwrap();
    assert!(text.starts_with("Hijacks:\n\nHijack two"));
    assert!(text.contains("\n\nHijack one"));
    assert_eq!(text.matches("Hijacks:").count(), 1);
}

#[test]
fn address_owned_by_nothing() {
    let svc = service(vec![
        (MapKind::Ram, vec![Descriptor::new("$7E0019", 1, "Powerup")]),
        (MapKind::Rom, vec![Descriptor::new("$008000", 1, "Reset")]),
    ]);
    let line = "LDA $7F0000";
    assert_eq!(
        svc.resolve_hover(line, cursor_in(line, "$7F0000")).as_deref(),
        Some("Nothing found")
    );
}

#[test]
fn smaller_descriptor_wins_overlap() {
    let svc = service(vec![(
        MapKind::Ram,
        vec![
            Descriptor::new("$7E0000", 0x100, "Scratch"),
            Descriptor::new("$7E0010", 2, "Timer"),
        ],
    )]);
    for needle in ["$10", "$11"] {
        let line = format!("LDA {needle}");
        let text = svc.resolve_hover(&line, 5).unwrap();
        assert!(text.starts_with("Timer"), "{needle} -> {text}");
    }
    let text = svc.resolve_hover("LDA $12", 5).unwrap();
    assert!(text.starts_with("Scratch"));
}

#[test]
fn markup_is_normalized_before_display() {
    let svc = service(vec![(
        MapKind::Registers,
        vec![Descriptor::new(
            "$4200",
            1,
            "Interrupt enable. [url=https://docs.test/nmi]NMI docs[/url]\n[code]LDA #$81\nSTA $4200[/code]",
        )],
    )]);
    let text = svc.resolve_hover("STA $4200", 5).unwrap();
    assert_eq!(
        text,
        "Interrupt enable. [NMI docs](https://docs.test/nmi)\n\n```\nLDA #$81\nSTA $4200\n```"
    );
}

#[test]
fn cache_is_bounded_across_hovers() {
    let svc = service(vec![(
        MapKind::Ram,
        vec![Descriptor::new("$7E0000", 0x20000, "WRAM")],
    )]);
    for i in 0..3001u32 {
        let line = format!("LDA $7E{:04X}", i);
        assert!(svc.resolve_hover(&line, 5).is_some());
    }
    let stats = svc.cache_stats();
    assert!(stats.entries <= 3000);
    assert_eq!(stats.clears, 1);

    svc.resolve_hover("LDA $7E0000", 5);
    assert!(svc.cache_stats().entries <= 3000);
}
