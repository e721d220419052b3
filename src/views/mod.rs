//! Server-rendered HTML pages.
//!
//! Templates are compiled into the binary. Every `.html` template is auto-escaped, so
//! values from the database are always rendered as text.

use axum::response::Html;
use minijinja::{Environment, context};
use serde::Serialize;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("templates/base.html")),
    ("index.html", include_str!("templates/index.html")),
    ("about.html", include_str!("templates/about.html")),
    ("register.html", include_str!("templates/register.html")),
    ("registered.html", include_str!("templates/registered.html")),
    ("login.html", include_str!("templates/login.html")),
    ("loggedout.html", include_str!("templates/loggedout.html")),
    ("users_list.html", include_str!("templates/users_list.html")),
    ("users_audit.html", include_str!("templates/users_audit.html")),
    ("workouts_list.html", include_str!("templates/workouts_list.html")),
    ("search.html", include_str!("templates/search.html")),
    ("add_workout.html", include_str!("templates/add_workout.html")),
    ("workout_added.html", include_str!("templates/workout_added.html")),
    ("workout_stats.html", include_str!("templates/workout_stats.html")),
    (
        "achievements_list.html",
        include_str!("templates/achievements_list.html"),
    ),
    (
        "achievements_add.html",
        include_str!("templates/achievements_add.html"),
    ),
    (
        "achievements_report.html",
        include_str!("templates/achievements_report.html"),
    ),
];

pub struct Views {
    env: Environment<'static>,
    site_name: String,
}

impl Views {
    pub fn new(site_name: impl Into<String>) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }

        Ok(Self {
            env,
            site_name: site_name.into(),
        })
    }

    /// Renders `name` with the page model. `current_user` drives the header on every page.
    pub fn render<M: Serialize>(
        &self,
        name: &str,
        current_user: Option<&str>,
        model: M,
    ) -> Result<Html<String>, minijinja::Error> {
        let template = self.env.get_template(name)?;
        let body = template.render(context! {
            site_name => &self.site_name,
            current_user => current_user,
            model => model,
        })?;
        Ok(Html(body))
    }
}
