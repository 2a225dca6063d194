//! Routed pages and their static copy.

/// A routed page of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    #[default]
    Home,
    Roster,
    Partners,
    News,
    About,
    Legal,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Home,
        Page::Roster,
        Page::Partners,
        Page::News,
        Page::About,
        Page::Legal,
    ];

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Roster => "Roster",
            Page::Partners => "Partners",
            Page::News => "News",
            Page::About => "About",
            Page::Legal => "Legal",
        }
    }

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Roster => "/roster",
            Page::Partners => "/partners",
            Page::News => "/news",
            Page::About => "/about",
            Page::Legal => "/legal",
        }
    }

    /// Position in navigation order, zero-based.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Page at `index` in navigation order.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Next page in navigation order, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous page in navigation order, wrapping around.
    #[must_use]
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Whether the statistic counters are part of this page.
    #[must_use]
    pub const fn has_stats(self) -> bool {
        matches!(self, Page::Home)
    }

    /// Static body copy, one entry per rendered line.
    #[must_use]
    pub const fn body(self) -> &'static [&'static str] {
        match self {
            Page::Home => HOME,
            Page::Roster => ROSTER,
            Page::Partners => PARTNERS,
            Page::News => NEWS,
            Page::About => ABOUT,
            Page::Legal => LEGAL,
        }
    }
}

const HOME: &[&str] = &[
    "# ORA",
    "",
    "Players, creators and the people who cheer for them.",
    "",
    "Ora is a community-run organization fielding competitive teams and",
    "backing the creators who grow alongside them. We run open tryouts,",
    "weekly community nights and a season-long event circuit.",
    "",
    "## What we do",
    "",
    "- Competitive rosters across three titles",
    "- A creator program with shared production and coaching",
    "- Local meetups and online tournaments open to everyone",
    "",
    "## Season highlights",
    "",
    "- Regional finals in both major leagues",
    "- First community-hosted LAN, sold out in a weekend",
    "- Partner-backed scholarship for two academy players",
    "",
    "## Join in",
    "",
    "Tryouts open at the start of every split. Watch the News page or",
    "follow any of our creators to hear first.",
    "",
    "## By the numbers",
];

const ROSTER: &[&str] = &[
    "# Roster",
    "",
    "## Main team",
    "",
    "- Kestrel  (captain, support)",
    "- Vanta    (entry)",
    "- Mossline (flex)",
    "- Juniper  (anchor)",
    "- Halcyon  (in-game leader)",
    "",
    "## Academy",
    "",
    "- Tern",
    "- Quill",
    "- Rook",
    "",
    "## Creators",
    "",
    "- Pixelmoth",
    "- Saltmarsh",
    "- Low Orbit",
];

const PARTNERS: &[&str] = &[
    "# Partners",
    "",
    "Ora is supported by partners who share our focus on community first.",
    "",
    "- Northlight Peripherals (hardware)",
    "- Cask & Kettle (hospitality, LAN venue)",
    "- Fathom Networks (hosting)",
    "- Greywater Apparel (team kit)",
    "",
    "Interested in partnering? Reach out through the About page.",
];

const NEWS: &[&str] = &[
    "# News",
    "",
    "## Tryouts open for the summer split",
    "Applications are open to all regions. Academy spots available.",
    "",
    "## Community night moves to Thursdays",
    "Same games, same people, one day earlier.",
    "",
    "## Main team qualifies for regional finals",
    "A clean run through the open bracket puts us in the final eight.",
];

const ABOUT: &[&str] = &[
    "# About",
    "",
    "Ora started as a weekly scrim group and grew into an organization",
    "with rosters, creators and a staff of volunteers.",
    "",
    "We care about sustainable schedules, transparent pay for players and",
    "keeping our events open to newcomers.",
    "",
    "Contact: hello@ora.example",
];

const LEGAL: &[&str] = &[
    "# Legal",
    "",
    "All trademarks belong to their respective owners.",
    "",
    "This site stores nothing about you and sets no cookies.",
    "",
    "Copyright Ora. All rights reserved.",
];
