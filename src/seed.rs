use anyhow::Result;
use chrono::{Duration, Utc};
use tracing::info;

use crate::database::models::*;
use crate::database::Stores;
use crate::graph::{EntityGraph, Identities};

fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

/// Demo data set: two organizations with users, roles, a shared template
/// and a handful of protocols in different states.
pub fn demo_graph() -> EntityGraph {
    let now = Utc::now();
    let mut graph = EntityGraph::new();

    let district = graph.insert(Organization {
        name: text("Kreisverband Nord"),
        address: text("Hafenstrasse 12"),
        city: text("Kiel"),
        postal_code: text("24103"),
        country: text("DE"),
        organization_type: text("district"),
        created_or_edited: Some(now),
        ..Default::default()
    });
    let local = graph.insert(Organization {
        name: text("Ortsverein Gaarden"),
        city: text("Kiel"),
        postal_code: text("24143"),
        country: text("DE"),
        organization_type: text("local"),
        created_or_edited: Some(now),
        ..Default::default()
    });

    let admin = graph.insert(Role {
        name: text("ADMIN"),
        description: text("Manages users and templates of an organization"),
        ..Default::default()
    });
    let author = graph.insert(Role {
        name: text("AUTHOR"),
        description: text("Writes and submits protocols"),
        ..Default::default()
    });

    let anna = graph.insert(PlatformUser {
        user_name: text("a.petersen"),
        first_name: text("Anna"),
        last_name: text("Petersen"),
        email: text("a.petersen@example.org"),
        last_password_change: Some(now - Duration::days(30)),
        password_change_required: Some(false),
        created_or_edited: Some(now),
        ..Default::default()
    });
    let jonas = graph.insert(PlatformUser {
        user_name: text("j.hansen"),
        first_name: text("Jonas"),
        last_name: text("Hansen"),
        email: text("j.hansen@example.org"),
        password_change_required: Some(true),
        created_or_edited: Some(now),
        ..Default::default()
    });
    graph.add_associated(district, anna);
    graph.add_associated(local, jonas);

    for (user, organization, role) in [(anna, district, admin), (anna, district, author), (jonas, local, author)] {
        let grant = graph.insert(UserRole::default());
        graph.add_associated(user, grant);
        graph.add_associated(organization, grant);
        graph.add_associated(role, grant);
    }

    let session = graph.insert(UserSession::default());
    graph.add_associated(anna, session);

    let template = graph.insert(ProtocolTemplate {
        name: text("Einsatzprotokoll"),
        description: text("Standard operation report"),
        template: text("<h1>Einsatz</h1><p>Ort:</p><p>Verlauf:</p>"),
        created_or_edited: Some(now),
        ..Default::default()
    });
    for organization in [district, local] {
        let link = graph.insert(TemplateOrganization::default());
        graph.add_associated(organization, link);
        graph.add_associated(template, link);
    }

    let closed = graph.insert(Protocol {
        is_draft: Some(false),
        is_closed: Some(true),
        closed_at: Some(now - Duration::days(2)),
        created_or_edited: Some(now - Duration::days(3)),
        ..Default::default()
    });
    let draft = graph.insert(Protocol {
        is_draft: Some(true),
        is_closed: Some(false),
        review_comment: text("Verlauf ergaenzen"),
        created_or_edited: Some(now),
        ..Default::default()
    });
    graph.set_associated(district, [closed]);
    graph.add_associated(local, draft);
    graph.add_associated(anna, closed);
    graph.add_associated(jonas, draft);

    let closed_content = graph.insert(ProtocolContent {
        content: text("<h1>Einsatz</h1><p>Ort: Kiel Hafen</p>"),
        ..Default::default()
    });
    let draft_content = graph.insert(ProtocolContent {
        content: text("<h1>Einsatz</h1><p>Ort: Gaarden</p>"),
        ..Default::default()
    });
    let pdf = graph.insert(ProtocolPdfFile {
        content: text("JVBERi0xLjQKJcOkw7zDtsOfCg=="),
        mime_type: text("application/pdf"),
        ..Default::default()
    });
    graph.set_partner(closed, Some(closed_content));
    graph.set_partner(closed, Some(pdf));
    graph.set_partner(draft, Some(draft_content));

    // Left without a protocol, shows up under filter=protocol-is-null
    graph.insert(ProtocolContent {
        content: text("<p>Entwurf ohne Protokoll</p>"),
        ..Default::default()
    });

    let helper = graph.insert(AdditionalUser::default());
    graph.add_associated(jonas, helper);
    graph.add_associated(closed, helper);

    graph
}

pub async fn load_seed_data(stores: &Stores) -> Result<Identities> {
    let ids = demo_graph().persist(stores).await?;
    info!("Loaded {} demo records", ids.len());
    Ok(ids)
}
