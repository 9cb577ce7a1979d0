//! Annotation rendering.
//!
//! Turns a [`Resolution`] into a structured [`Annotation`] and then into
//! Markdown text. Lines inside one region note are joined with a
//! Markdown hard break (`"  \n"`).

use std::fmt;

use crate::descriptor::{DescriptorRange, Space};
use crate::resolve::Resolution;

/// Text shown when no descriptor owns an address.
pub const NOTHING_FOUND: &str = "Nothing found";

/// Header placed before hijack notes.
pub const HIJACKS_HEADER: &str = "Hijacks:";

/// Default detail link template.
pub const DEFAULT_DETAIL_URL: &str =
    "https://www.smwcentral.net/?p=memorymap&a=detail&game={game}&region={region}&detail={detail}";

const HARD_BREAK: &str = "  \n";

/// Inclusive boundaries of a multi-byte region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    pub begin: u32,
    pub last: u32,
    /// Hex digits to pad to.
    pub width: usize,
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Starts at ${:0w$X} and ends at ${:0w$X}.",
            self.begin,
            self.last,
            w = self.width
        )
    }
}

/// A cross-reference to a detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailLink {
    pub label: String,
    pub url: String,
}

/// Rendered facts about one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionNote {
    pub text: String,
    pub links: Vec<DetailLink>,
    /// Present only for regions larger than one byte.
    pub boundary: Option<Boundary>,
}

impl RegionNote {
    pub fn render(&self) -> String {
        let mut lines: Vec<String> = vec![self.text.clone()];
        lines.extend(
            self.links
                .iter()
                .map(|link| format!("[{}]({})", link.label, link.url)),
        );
        if let Some(boundary) = &self.boundary {
            lines.push(boundary.to_string());
        }
        lines.join(HARD_BREAK)
    }
}

/// Everything known about one looked-up address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    NothingFound,
    Found {
        primary: RegionNote,
        /// The primary note is itself a hijack.
        primary_is_hijack: bool,
        hijacks: Vec<RegionNote>,
    },
}

impl Annotation {
    /// Render to display text.
    pub fn render(&self) -> String {
        let (primary, primary_is_hijack, hijacks) = match self {
            Annotation::NothingFound => return NOTHING_FOUND.to_string(),
            Annotation::Found {
                primary,
                primary_is_hijack,
                hijacks,
            } => (primary, *primary_is_hijack, hijacks),
        };

        let mut out = String::new();
        if primary_is_hijack {
            out.push_str(HIJACKS_HEADER);
            out.push_str("\n\n");
        }
        out.push_str(&primary.render());

        if !hijacks.is_empty() {
            if !primary_is_hijack {
                out.push_str("\n\n---\n\n");
                out.push_str(HIJACKS_HEADER);
            }
            for note in hijacks {
                out.push_str("\n\n");
                out.push_str(&note.render());
            }
        }
        out
    }
}

/// Builds annotations with a detail link template.
#[derive(Debug, Clone)]
pub struct Renderer {
    game: String,
    detail_url: String,
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::new("smw", DEFAULT_DETAIL_URL)
    }
}

impl Renderer {
    /// `detail_url` may use `{game}`, `{region}` and `{detail}` placeholders.
    pub fn new(game: impl Into<String>, detail_url: impl Into<String>) -> Self {
        Renderer {
            game: game.into(),
            detail_url: detail_url.into(),
        }
    }

    pub fn detail_url(&self, region: &str, detail: &str) -> String {
        self.detail_url
            .replace("{game}", &self.game)
            .replace("{region}", region)
            .replace("{detail}", detail)
    }

    /// Describe one descriptor as seen from `space`.
    pub fn note(&self, range: &DescriptorRange, space: Space) -> RegionNote {
        let descriptor = range.descriptor();
        let links = descriptor
            .details
            .iter()
            .flatten()
            .map(|(id, label)| DetailLink {
                label: label.clone(),
                url: self.detail_url(space.region(), id),
            })
            .collect();
        let boundary = (descriptor.size > 1).then(|| Boundary {
            begin: range.begin(),
            last: range.last(),
            width: space.pad_width(),
        });
        RegionNote {
            text: descriptor.description.clone(),
            links,
            boundary,
        }
    }

    pub fn annotate(&self, resolution: &Resolution<'_>) -> Annotation {
        let Some(primary) = resolution.primary else {
            return Annotation::NothingFound;
        };
        let primary_space = if resolution.primary_is_hijack {
            Space::Rom
        } else {
            resolution.address.space()
        };
        Annotation::Found {
            primary: self.note(primary, primary_space),
            primary_is_hijack: resolution.primary_is_hijack,
            hijacks: resolution
                .hijacks
                .iter()
                .map(|range| self.note(range, Space::Rom))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Descriptor, MapKind};
    use crate::markup::Normalizer;
    use crate::repository::DescriptorRepository;
    use crate::resolve::resolve;
    use crate::token::CanonicalAddress;

    fn range(desc: Descriptor) -> DescriptorRange {
        DescriptorRange::new(desc).unwrap()
    }

    #[test]
    fn boundary_padding() {
        let b = Boundary {
            begin: 0x2116,
            last: 0x2117,
            width: 4,
        };
        assert_eq!(b.to_string(), "Starts at $2116 and ends at $2117.");
        let b = Boundary {
            begin: 0x7E0000,
            last: 0x7E1FFF,
            width: 6,
        };
        assert_eq!(b.to_string(), "Starts at $7E0000 and ends at $7E1FFF.");
        let b = Boundary {
            begin: 0x8000,
            last: 0x80FF,
            width: 6,
        };
        assert_eq!(b.to_string(), "Starts at $008000 and ends at $0080FF.");
    }

    #[test]
    fn single_byte_has_no_boundary() {
        let note = Renderer::default().note(&range(Descriptor::new("$7E0019", 1, "Powerup")), Space::Ram);
        assert!(note.boundary.is_none());
        assert_eq!(note.render(), "Powerup");
    }

    #[test]
    fn detail_links() {
        let desc = Descriptor::new("$7E0019", 1, "Powerup").with_details([("12", "Valid values")]);
        let note = Renderer::default().note(&range(desc), Space::Ram);
        assert_eq!(
            note.render(),
            "Powerup  \n[Valid values](https://www.smwcentral.net/?p=memorymap&a=detail&game=smw&region=ram&detail=12)"
        );
    }

    #[test]
    fn note_with_links_and_boundary() {
        let desc = Descriptor::new("$2116", 2, "VRAM address").with_details([("3", "Bits")]);
        let renderer = Renderer::new("smw", "https://d.test/{region}/{detail}");
        let note = renderer.note(&range(desc), Space::Register);
        assert_eq!(
            note.render(),
            "VRAM address  \n[Bits](https://d.test/ram/3)  \nStarts at $2116 and ends at $2117."
        );
    }

    #[test]
    fn nothing_found_renders_literal() {
        assert_eq!(Annotation::NothingFound.render(), "Nothing found");
    }

    #[test]
    fn secondary_hijacks_section() {
        let repo = DescriptorRepository::build(
            vec![
                (MapKind::Rom, vec![Descriptor::new("$008000", 1, "Reset")]),
                (MapKind::Hijacks, vec![Descriptor::new("$008000", 4, "Patch")]),
            ],
            &Normalizer::default(),
        );
        let res = resolve(&repo, CanonicalAddress::Rom(0x008000));
        let text = Renderer::default().annotate(&res).render();
        assert_eq!(
            text,
            "Reset\n\n---\n\nHijacks:\n\nPatch  \nStarts at $008000 and ends at $008003."
        );
    }

    #[test]
    fn promoted_hijack_gets_header() {
        let repo = DescriptorRepository::build(
            vec![(
                MapKind::Hijacks,
                vec![
                    Descriptor::new("$00A000", 1, "First"),
                    Descriptor::new("$00A000", 2, "Second"),
                ],
            )],
            &Normalizer::default(),
        );
        let res = resolve(&repo, CanonicalAddress::Rom(0x00A000));
        let annotation = Renderer::default().annotate(&res);
        assert!(matches!(
            annotation,
            Annotation::Found {
                primary_is_hijack: true,
                ..
            }
        ));
        assert_eq!(
            annotation.render(),
            "Hijacks:\n\nSecond  \nStarts at $00A000 and ends at $00A001.\n\nFirst"
        );
    }

    #[test]
    fn hijack_details_link_to_rom_region() {
        let repo = DescriptorRepository::build(
            vec![(
                MapKind::Hijacks,
                vec![Descriptor::new("$00A000", 1, "Patch").with_details([("9", "Info")])],
            )],
            &Normalizer::default(),
        );
        let res = resolve(&repo, CanonicalAddress::Rom(0x00A000));
        let text = Renderer::default().annotate(&res).render();
        assert!(text.contains("region=rom&detail=9"));
    }
}
