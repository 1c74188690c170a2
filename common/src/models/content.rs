// common/src/models/content.rs
use serde::{Deserialize, Serialize};

/// Number of research domain lines the footer renders
pub const FOOTER_DOMAIN_SLOTS: usize = 5;

/// Everything the marketing pages display, editable from the admin panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteContent {
    pub hero: Hero,
    pub stats: Stats,
    pub about: About,
    pub contact: Contact,
    pub logo: Logo,
    pub footer: Footer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub primary_button_text: String,
    pub secondary_button_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub researchers: u32,
    pub publications: u32,
    pub awards: u32,
    pub events: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct About {
    pub team_name: String,
    pub description: String,
    pub mission: String,
    pub history: History,
    pub team: Vec<Researcher>,
    pub expertise: Vec<ExpertiseArea>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub title: String,
    pub content: Vec<String>,
    pub values: Vec<Value>,
    pub achievements: Achievements,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Value {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievements {
    pub founded: String,
    pub researchers: String,
    pub publications: String,
    pub awards: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Researcher {
    pub id: String,
    pub name: String,
    pub role: String,
    pub bio: String,
    pub expertise: Vec<String>,
    pub education: String,
    pub publications: u32,
    pub citations: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpertiseArea {
    pub title: String,
    pub description: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub address: String,
    pub phone: String,
    pub email: String,
    pub hours: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Logo {
    pub text: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Footer {
    pub research_domains: Vec<String>,
    pub team_introduction: String,
    pub team_name: String,
    pub copyright: String,
}

impl Default for Footer {
    fn default() -> Self {
        Self {
            research_domains: vec![String::new(); FOOTER_DOMAIN_SLOTS],
            team_introduction: String::new(),
            team_name: String::new(),
            copyright: String::new(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for SiteContent {
    fn default() -> Self {
        Self {
            hero: Hero {
                title: "Innovation & Scientific Excellence".into(),
                subtitle: "Advanced Research Laboratory".into(),
                description: "We push the boundaries of knowledge through innovative research and \
                    leading interdisciplinary collaborations."
                    .into(),
                primary_button_text: "Explore our projects".into(),
                secondary_button_text: "Join the team".into(),
            },
            stats: Stats {
                researchers: 28,
                publications: 156,
                awards: 15,
                events: 52,
            },
            about: About {
                team_name: "Research Excellence Team".into(),
                description: "A multidisciplinary team dedicated to scientific innovation".into(),
                mission: "Turning scientific discoveries into concrete solutions for society".into(),
                history: History {
                    title: "Our History".into(),
                    content: strings(&[
                        "The team was founded in 2010 to build an interdisciplinary research \
                         environment beyond traditional field boundaries.",
                        "What started as a group of three researchers grew into one of the most \
                         active research centres in the country.",
                        "Today more than 25 permanent researchers and many international \
                         collaborators share the same passion for responsible innovation.",
                    ]),
                    values: vec![
                        Value {
                            title: "Scientific excellence".into(),
                            description: "We aim for excellence in all our research and publications.".into(),
                        },
                        Value {
                            title: "Collaboration".into(),
                            description: "We believe in interdisciplinary collaboration.".into(),
                        },
                        Value {
                            title: "Responsible innovation".into(),
                            description: "We build technology that benefits society.".into(),
                        },
                        Value {
                            title: "Diversity and inclusion".into(),
                            description: "We value diverse perspectives and experiences.".into(),
                        },
                    ],
                    achievements: Achievements {
                        founded: "2010".into(),
                        researchers: "25+".into(),
                        publications: "150+".into(),
                        awards: "12".into(),
                    },
                },
                team: vec![
                    Researcher {
                        id: "prof-martin".into(),
                        name: "Prof. Jean Martin".into(),
                        role: "Research Director".into(),
                        bio: "Leads the team since 2010, specialist in ethical artificial intelligence.".into(),
                        expertise: strings(&["Artificial Intelligence", "Technology Ethics", "Machine Learning"]),
                        education: "PhD in Computer Science (2005)".into(),
                        publications: 120,
                        citations: 5600,
                    },
                    Researcher {
                        id: "dr-dubois".into(),
                        name: "Dr. Sophie Dubois".into(),
                        role: "Principal Researcher".into(),
                        bio: "Works on biotechnology and personalised medicine.".into(),
                        expertise: strings(&["Biotechnology", "Personalised Medicine", "Gene Therapy"]),
                        education: "PhD in Molecular Biology (2012)".into(),
                        publications: 85,
                        citations: 3200,
                    },
                ],
                expertise: vec![
                    ExpertiseArea {
                        title: "Ethical Artificial Intelligence".into(),
                        description: "Responsible and transparent AI with a focus on fairness, \
                            explainability and privacy."
                            .into(),
                        skills: strings(&["Machine learning", "Explainable AI", "Algorithmic fairness", "AI governance"]),
                    },
                    ExpertiseArea {
                        title: "Personalised Medicine".into(),
                        description: "Adapting treatments to the individual characteristics of each patient.".into(),
                        skills: strings(&["Genomics", "Targeted therapy", "Biomarkers", "Precision medicine"]),
                    },
                ],
            },
            contact: Contact {
                address: "123 Research Avenue, 75001 Paris, France".into(),
                phone: "+33 1 23 45 67 89".into(),
                email: "contact@research-excellence.fr".into(),
                hours: "Monday - Friday: 9:00 - 18:00".into(),
            },
            logo: Logo {
                text: "Research Excellence".into(),
                subtitle: "Innovation Laboratory".into(),
            },
            footer: Footer::default(),
        }
    }
}

/// Section-level partial update from the admin editor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentPatch {
    pub hero: Option<Hero>,
    pub stats: Option<Stats>,
    pub about: Option<About>,
    pub contact: Option<Contact>,
    pub logo: Option<Logo>,
    pub footer: Option<Footer>,
}

impl ContentPatch {
    /// Replace every section present in the patch
    pub fn apply_to(&self, content: &mut SiteContent) {
        if let Some(hero) = &self.hero {
            content.hero = hero.clone();
        }
        if let Some(stats) = self.stats {
            content.stats = stats;
        }
        if let Some(about) = &self.about {
            content.about = about.clone();
        }
        if let Some(contact) = &self.contact {
            content.contact = contact.clone();
        }
        if let Some(logo) = &self.logo {
            content.logo = logo.clone();
        }
        if let Some(footer) = &self.footer {
            content.footer = footer.clone();
        }
    }
}

/// Flattened server row behind `/api/site-content/`.
///
/// Only the contact and footer sections are stored server side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteContentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_hours: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_research_domains: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_team_introduction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_team_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_copyright: Option<String>,
}

impl SiteContentRecord {
    /// Server fields for the sections a patch touches
    pub fn from_patch(patch: &ContentPatch) -> Self {
        let mut record = Self::default();
        if let Some(contact) = &patch.contact {
            record.contact_address = Some(contact.address.clone());
            record.contact_phone = Some(contact.phone.clone());
            record.contact_email = Some(contact.email.clone());
            record.contact_hours = Some(contact.hours.clone());
        }
        if let Some(footer) = &patch.footer {
            record.footer_research_domains = Some(footer.research_domains.clone());
            record.footer_team_introduction = Some(footer.team_introduction.clone());
            record.footer_team_name = Some(footer.team_name.clone());
            record.footer_copyright = Some(footer.copyright.clone());
        }
        record
    }

    /// Overwrite contact and footer; absent or null fields become blank
    pub fn apply_to(&self, content: &mut SiteContent) {
        content.contact = Contact {
            address: self.contact_address.clone().unwrap_or_default(),
            phone: self.contact_phone.clone().unwrap_or_default(),
            email: self.contact_email.clone().unwrap_or_default(),
            hours: self.contact_hours.clone().unwrap_or_default(),
        };
        let defaults = Footer::default();
        content.footer = Footer {
            research_domains: self
                .footer_research_domains
                .clone()
                .unwrap_or(defaults.research_domains),
            team_introduction: self.footer_team_introduction.clone().unwrap_or_default(),
            team_name: self.footer_team_name.clone().unwrap_or_default(),
            copyright: self.footer_copyright.clone().unwrap_or_default(),
        };
    }
}
