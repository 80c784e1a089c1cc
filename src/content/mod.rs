//! Content Source - immutable page copy.
//!
//! One JSON document describes every section. Records are read-only and
//! live for the whole page; controllers only ever read them. Missing
//! optional fields fall back to empty values, so a sparse document still
//! renders.

mod icons;

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::SelectOption;

pub use icons::Icon;

const PLACEHOLDER: &str = include_str!("placeholder.json");

// =============================================================================
// Shared records
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavLink {
    pub name: String,
    pub href: String,
    /// Ordinal shown beside menu links ("01").
    pub number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CallToAction {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub email: String,
    pub phone: String,
}

/// Copy with one emphasized run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Highlighted {
    pub text: String,
    pub highlight: String,
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Featured {
    pub image: String,
    pub studio_name: String,
    pub copyright: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavbarContent {
    pub brand_name: String,
    pub brand_mark: String,
    pub cta: CallToAction,
    pub bar_links: Vec<NavLink>,
    pub menu_links: Vec<NavLink>,
    pub featured: Featured,
    pub contact: Contact,
    pub social_links: Vec<NavLink>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Logo {
    pub name: String,
    /// Icon name, resolved with [`Icon::from_name`].
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientProof {
    pub rating: String,
    pub trust_text: String,
    pub trust_highlight: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroContent {
    pub brand_name: String,
    pub brand_mark: String,
    pub description: String,
    pub logos: Vec<Logo>,
    pub clients: ClientProof,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkItem {
    pub id: String,
    pub title: String,
    pub category: String,
    pub year: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorksContent {
    pub section_number: String,
    pub section_title: String,
    pub section_description: String,
    pub view_all_link: CallToAction,
    pub items: Vec<WorkItem>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Feature {
    pub id: String,
    pub icon: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitHeadline {
    pub main: String,
    pub highlight: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WhyUsContent {
    pub section_label: String,
    pub section_number: String,
    pub headline: SplitHeadline,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Package {
    pub id: String,
    pub name: String,
    pub price: u32,
    pub popular: bool,
    pub description: String,
    pub features: Vec<String>,
}

impl SelectOption for Package {
    fn key(&self) -> &str {
        &self.id
    }

    fn is_default(&self) -> bool {
        self.popular
    }
}

/// Billing-period tab above the package list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanTab {
    pub id: String,
    pub label: String,
    pub default: bool,
}

impl SelectOption for PlanTab {
    fn key(&self) -> &str {
        &self.id
    }

    fn is_default(&self) -> bool {
        self.default
    }
}

fn default_plan_tabs() -> Vec<PlanTab> {
    vec![
        PlanTab { id: "monthly".into(), label: "Monthly".into(), default: true },
        PlanTab { id: "project".into(), label: "Per project".into(), default: false },
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PricingContent {
    pub section_title: String,
    pub section_description: String,
    pub section_number: String,
    pub packages: Vec<Package>,
    pub tabs: Vec<PlanTab>,
}

impl Default for PricingContent {
    fn default() -> Self {
        Self {
            section_title: String::new(),
            section_description: String::new(),
            section_number: String::new(),
            packages: Vec::new(),
            tabs: default_plan_tabs(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestimonialKind {
    Video,
    #[default]
    Text,
}

impl TestimonialKind {
    /// Rendered card width in pixels.
    pub fn card_width_px(&self) -> f64 {
        match self {
            TestimonialKind::Video => 380.0,
            TestimonialKind::Text => 340.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Testimonial {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TestimonialKind,
    pub name: String,
    pub role: String,
    pub avatar: String,
    pub quote: Option<String>,
    pub rating: Option<f32>,
    pub rating_text: Option<String>,
    pub video_thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestimonialsContent {
    pub section_label: String,
    pub section_number: String,
    pub headline: String,
    pub items: Vec<Testimonial>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FooterBrand {
    pub name: String,
    pub brand_mark: String,
    pub tagline: String,
}

impl FooterBrand {
    /// The line animated letter by letter: name, mark, space, tagline.
    pub fn display_text(&self) -> String {
        format!("{}{} {}", self.name, self.brand_mark, self.tagline)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Newsletter {
    pub heading: String,
    pub placeholder: String,
    pub button_label: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkGroup {
    pub title: String,
    pub links: Vec<NavLink>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FooterContent {
    pub brand: FooterBrand,
    pub description: Highlighted,
    pub contact: Contact,
    pub newsletter: Newsletter,
    pub link_groups: Vec<LinkGroup>,
    pub copyright: String,
}

// =============================================================================
// Document
// =============================================================================

/// The whole page's copy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageContent {
    pub navbar: NavbarContent,
    pub hero: HeroContent,
    pub works: WorksContent,
    pub why_us: WhyUsContent,
    pub pricing: PricingContent,
    pub testimonials: TestimonialsContent,
    pub footer: FooterContent,
}

impl PageContent {
    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// The bundled placeholder document, shared.
    pub fn placeholder() -> Result<Rc<Self>> {
        Ok(Rc::new(Self::from_json_str(PLACEHOLDER)?))
    }
}
