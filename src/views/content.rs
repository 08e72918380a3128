// src/views/content.rs
//! Fixed copy for the informational pages.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Link {
    pub label: &'static str,
    pub href: &'static str,
}

const fn link(label: &'static str, href: &'static str) -> Link {
    Link { label, href }
}

pub const BRAND: &str = "SRM University";

pub static NAV_LINKS: [Link; 3] = [link("Campus", "/campus"), link("Events", "/events"), link("Hostel", "/hostel")];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuthAction {
    Login { href: &'static str },
    SignOut { endpoint: &'static str },
}

#[derive(Debug, Clone, Serialize)]
pub struct Navbar {
    pub brand: &'static str,
    pub home: &'static str,
    pub links: &'static [Link],
    pub auth_action: AuthAction,
}

impl Navbar {
    pub fn signed_in(&self) -> bool {
        matches!(self.auth_action, AuthAction::SignOut { .. })
    }

    /// Where the auth control points: the login page, or the logout endpoint once signed in.
    pub fn auth_href(&self) -> &'static str {
        match self.auth_action {
            AuthAction::Login { href } => href,
            AuthAction::SignOut { endpoint } => endpoint,
        }
    }
}

pub fn navbar(signed_in: bool) -> Navbar {
    Navbar {
        brand: BRAND,
        home: "/",
        links: &NAV_LINKS,
        auth_action: if signed_in {
            AuthAction::SignOut {
                endpoint: "/api/auth/logout",
            }
        } else {
            AuthAction::Login { href: "/login" }
        },
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Footer {
    pub name: &'static str,
    pub address: &'static str,
    pub phone: &'static str,
    pub email: &'static str,
    pub quick_links: &'static [Link],
    pub social_blurb: &'static str,
    pub social_links: &'static [Link],
    pub copyright: String,
}

static SOCIAL_LINKS: [Link; 3] = [
    link("Facebook", "https://www.facebook.com/SRMUniversityOfficial"),
    link("Twitter", "https://twitter.com/SRM_Univ"),
    link("Instagram", "https://www.instagram.com/srm_university/"),
];

pub fn footer(year: i32) -> Footer {
    Footer {
        name: BRAND,
        address: "SRM Nagar, Kattankulathur - 603203",
        phone: "+91 44 2741 7777",
        email: "info@srmist.edu.in",
        quick_links: &NAV_LINKS,
        social_blurb: "Follow us on social media for updates and news",
        social_links: &SOCIAL_LINKS,
        copyright: format!("© {} SRM Institute of Science and Technology. All rights reserved.", year),
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Feature {
    pub title: &'static str,
    pub text: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Teaser {
    pub title: &'static str,
    pub text: &'static str,
    pub image: &'static str,
    pub href: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomePage {
    pub hero_title: &'static str,
    pub hero_subtitle: &'static str,
    pub hero_image: &'static str,
    pub call_to_action: Link,
    pub features: [Feature; 3],
    pub latest_events: [Teaser; 1],
}

pub const HOME: HomePage = HomePage {
    hero_title: "Welcome to AIverse SRM",
    hero_subtitle: "Transforming Lives Through Knowledge and Innovation",
    hero_image: "https://images.unsplash.com/photo-1562774053-701939374585?ixlib=rb-4.0.3&ixid=M3wxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8fA%3D%3D&auto=format&fit=crop&w=1986&q=80",
    call_to_action: link("Explore Campus", "/campus"),
    features: [
        Feature {
            title: "World-Class Education",
            text: "Access to cutting-edge facilities and expert faculty",
        },
        Feature {
            title: "Vibrant Community",
            text: "Join a diverse community of learners and innovators",
        },
        Feature {
            title: "Prime Location",
            text: "Located in the heart of Chennai's IT corridor",
        },
    ],
    latest_events: [Teaser {
        title: "Tech Symposium 2025",
        text: "Join us for the biggest tech event of the year",
        image: "https://images.unsplash.com/photo-1540575467063-178a50c2df87?ixlib=rb-4.0.3&ixid=M3wxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8fA%3D%3D&auto=format&fit=crop&w=2070&q=80",
        href: "/events",
    }],
};

#[derive(Debug, Clone, Serialize)]
pub struct HostelInfo {
    pub breakfast: &'static [&'static str],
    pub lunch: &'static [&'static str],
    pub dinner: &'static [&'static str],
    pub facilities: &'static [&'static str],
}

pub const HOSTEL: HostelInfo = HostelInfo {
    breakfast: &["Idli", "Sambar", "Chutney", "Tea/Coffee"],
    lunch: &["Rice", "Dal", "Mixed Vegetables", "Curd", "Pickle"],
    dinner: &["Chapati", "Paneer Curry", "Rice", "Dal"],
    facilities: &[
        "Wi-Fi Enabled Rooms",
        "24/7 Security",
        "Laundry Service",
        "Reading Room",
        "Gym",
        "Indoor Games",
    ],
};

#[derive(Debug, Clone, Copy)]
pub struct Meal {
    pub name: &'static str,
    pub items: &'static [&'static str],
}

impl HostelInfo {
    pub fn meals(&self) -> [Meal; 3] {
        [
            Meal {
                name: "Breakfast",
                items: self.breakfast,
            },
            Meal {
                name: "Lunch",
                items: self.lunch,
            },
            Meal {
                name: "Dinner",
                items: self.dinner,
            },
        ]
    }
}
