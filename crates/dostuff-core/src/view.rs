//! View navigation state machine.
//!
//! The site shows exactly one [`ViewState`] at a time. Every control that
//! moves the visitor somewhere sends a [`RouteId`] to a [`Navigator`], which
//! applies the new view synchronously and hands back a [`Transition`]
//! describing where the viewport should scroll. Performing the scroll is the
//! presentation layer's job.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::NavigationError;

/// Anchor id of the features section on the home view.
pub const FEATURES_ANCHOR: &str = "features";

/// The page currently displayed by the site shell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewState {
    #[default]
    Home,
    Download,
    HowItWorks,
    Pricing,
    Privacy,
    Terms,
    Support,
    Contact,
}

impl ViewState {
    /// Every view, in navbar/footer order.
    pub const ALL: [Self; 8] = [
        Self::Home,
        Self::Download,
        Self::HowItWorks,
        Self::Pricing,
        Self::Privacy,
        Self::Terms,
        Self::Support,
        Self::Contact,
    ];

    /// Stable identifier, identical to the route id of the same name.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Download => "download",
            Self::HowItWorks => "how-it-works",
            Self::Pricing => "pricing",
            Self::Privacy => "privacy",
            Self::Terms => "terms",
            Self::Support => "support",
            Self::Contact => "contact",
        }
    }

    /// URL path the view is served at.
    #[must_use]
    pub fn path(self) -> String {
        match self {
            Self::Home => "/".to_owned(),
            other => format!("/{}", other.id()),
        }
    }

    /// Resolve a path segment (without the leading `/`) to a view.
    ///
    /// The empty segment is the home view.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::UnknownView`] if no view lives there.
    pub fn from_path(segment: &str) -> Result<Self, NavigationError> {
        let segment = segment.trim_matches('/');
        if segment.is_empty() {
            return Ok(Self::Home);
        }
        Self::ALL
            .into_iter()
            .find(|view| view.id() == segment)
            .ok_or_else(|| NavigationError::UnknownView {
                path: segment.to_owned(),
            })
    }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A navigation intent sent by a link, button, or footer entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteId {
    Home,
    Features,
    HowItWorks,
    Pricing,
    Download,
    Privacy,
    Terms,
    Support,
    Contact,
}

impl RouteId {
    /// Every route id accepted by the navigator.
    pub const ALL: [Self; 9] = [
        Self::Home,
        Self::Features,
        Self::HowItWorks,
        Self::Pricing,
        Self::Download,
        Self::Privacy,
        Self::Terms,
        Self::Support,
        Self::Contact,
    ];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Features => "features",
            Self::HowItWorks => "how-it-works",
            Self::Pricing => "pricing",
            Self::Download => "download",
            Self::Privacy => "privacy",
            Self::Terms => "terms",
            Self::Support => "support",
            Self::Contact => "contact",
        }
    }

    /// The view this route lands on and where the viewport goes afterwards.
    #[must_use]
    pub const fn resolve(self) -> Transition {
        let view = match self {
            Self::Home | Self::Features => ViewState::Home,
            Self::HowItWorks => ViewState::HowItWorks,
            Self::Pricing => ViewState::Pricing,
            Self::Download => ViewState::Download,
            Self::Privacy => ViewState::Privacy,
            Self::Terms => ViewState::Terms,
            Self::Support => ViewState::Support,
            Self::Contact => ViewState::Contact,
        };
        let scroll = match self {
            Self::Features => ScrollTarget::Anchor(FEATURES_ANCHOR),
            _ => ScrollTarget::Top,
        };
        Transition { view, scroll }
    }
}

impl FromStr for RouteId {
    type Err = NavigationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|route| route.id() == s)
            .ok_or_else(|| NavigationError::UnknownRoute { id: s.to_owned() })
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Where the viewport should end up after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "anchor", rename_all = "snake_case")]
pub enum ScrollTarget {
    /// Scroll to the top of the page.
    Top,
    /// Scroll the element with this id into view.
    Anchor(&'static str),
}

/// When a scroll instruction may be carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollTiming {
    /// No dependency on the new view's content.
    Immediate,
    /// The target element only exists once the new view has rendered.
    AfterRender,
}

impl ScrollTarget {
    #[must_use]
    pub const fn timing(self) -> ScrollTiming {
        match self {
            Self::Top => ScrollTiming::Immediate,
            Self::Anchor(_) => ScrollTiming::AfterRender,
        }
    }

    /// CSS `scroll-behavior` used for every transition.
    #[must_use]
    pub const fn behavior(self) -> &'static str {
        "smooth"
    }
}

/// The result of one navigation: the new view plus a scroll instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub view: ViewState,
    pub scroll: ScrollTarget,
}

impl Transition {
    /// Addressable location of the transition (`/pricing`, `/#features`).
    #[must_use]
    pub fn location(&self) -> String {
        match self.scroll {
            ScrollTarget::Top => self.view.path(),
            ScrollTarget::Anchor(anchor) => format!("{}#{anchor}", self.view.path()),
        }
    }
}

/// Holder of the single active view.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    view: ViewState,
}

impl Navigator {
    /// A navigator showing the home view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A navigator already showing `view`.
    #[must_use]
    pub fn at(view: ViewState) -> Self {
        Self { view }
    }

    #[must_use]
    pub fn view(&self) -> ViewState {
        self.view
    }

    /// Apply a navigation intent. Never fails: every route id has a target.
    pub fn navigate(&mut self, route: RouteId) -> Transition {
        let transition = route.resolve();
        tracing::debug!(
            route = %route,
            from = %self.view,
            to = %transition.view,
            "navigation"
        );
        self.view = transition.view;
        transition
    }

    /// Parse and apply a raw navigation id.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::UnknownRoute`] for ids outside the fixed
    /// set; the current view is left unchanged.
    pub fn navigate_id(&mut self, id: &str) -> Result<Transition, NavigationError> {
        let route = id.parse::<RouteId>()?;
        Ok(self.navigate(route))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn navigator_starts_at_home() {
        assert_eq!(Navigator::new().view(), ViewState::Home);
    }

    #[test]
    fn every_route_maps_to_documented_view_and_scroll() {
        let table = [
            ("home", ViewState::Home, ScrollTarget::Top),
            ("features", ViewState::Home, ScrollTarget::Anchor("features")),
            ("how-it-works", ViewState::HowItWorks, ScrollTarget::Top),
            ("pricing", ViewState::Pricing, ScrollTarget::Top),
            ("download", ViewState::Download, ScrollTarget::Top),
            ("privacy", ViewState::Privacy, ScrollTarget::Top),
            ("terms", ViewState::Terms, ScrollTarget::Top),
            ("support", ViewState::Support, ScrollTarget::Top),
            ("contact", ViewState::Contact, ScrollTarget::Top),
        ];

        for (id, view, scroll) in table {
            let mut nav = Navigator::at(ViewState::Contact);
            let transition = nav.navigate_id(id).unwrap();
            assert_eq!(transition.view, view, "view for {id}");
            assert_eq!(transition.scroll, scroll, "scroll for {id}");
            assert_eq!(nav.view(), view);
        }
    }

    #[test]
    fn unknown_id_fails_and_keeps_view() {
        let mut nav = Navigator::at(ViewState::Pricing);
        let err = nav.navigate_id("blog").unwrap_err();
        assert_eq!(
            err,
            NavigationError::UnknownRoute {
                id: "blog".to_owned()
            }
        );
        assert_eq!(nav.view(), ViewState::Pricing);
    }

    #[test]
    fn route_ids_are_case_sensitive() {
        assert!("Pricing".parse::<RouteId>().is_err());
    }

    #[test]
    fn anchor_scroll_waits_for_render() {
        let transition = RouteId::Features.resolve();
        assert_eq!(transition.scroll.timing(), ScrollTiming::AfterRender);
        assert_eq!(RouteId::Terms.resolve().scroll.timing(), ScrollTiming::Immediate);
        assert_eq!(transition.scroll.behavior(), "smooth");
    }

    #[test]
    fn locations() {
        assert_eq!(RouteId::Home.resolve().location(), "/");
        assert_eq!(RouteId::Features.resolve().location(), "/#features");
        assert_eq!(RouteId::HowItWorks.resolve().location(), "/how-it-works");
    }

    #[test]
    fn paths_round_trip_through_from_path() {
        for view in ViewState::ALL {
            assert_eq!(ViewState::from_path(&view.path()).unwrap(), view);
        }
        assert!(ViewState::from_path("features").is_err());
    }
}
