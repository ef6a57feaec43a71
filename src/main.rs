use std::sync::Arc;
use std::time::Duration;

use dialoguer::{theme::ColorfulTheme, Input, Select};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lead_console::config::Config;
use lead_console::gateway_client::LeadApiClient;
use lead_console::models::{LeadSource, ScoreTier};
use lead_console::query_store::{MutationOutcome, QueryStore};
use lead_console::views::{self, FormSubmit, LeadForm, LeadListView, ListRender};

/// Main entry point for the console.
///
/// Initializes tracing, loads configuration, builds the gateway client and
/// the process-scoped query store, then runs the interactive menu loop.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lead_console=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let client = LeadApiClient::new(
        config.api_base_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?;
    let store = Arc::new(QueryStore::new(client.clone()));
    tracing::info!("Connected to lead backend at {}", config.api_base_url);

    loop {
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Lead Console")
            .items(&[
                "Dashboard",
                "Browse leads",
                "Add lead",
                "Raw analytics",
                "Quit",
            ])
            .default(0)
            .interact()?;

        match choice {
            0 => show_dashboard(&store).await,
            1 => browse_leads(&store).await?,
            2 => add_lead(&store).await?,
            3 => show_analytics(&client).await,
            _ => break,
        }
    }

    Ok(())
}

async fn show_dashboard(store: &QueryStore) {
    if let Err(e) = store.stats().await {
        tracing::warn!("Stats fetch failed: {}", e);
    }
    let render = views::dashboard(&store.stats_state().await);

    println!("\n=== Lead Scoring Dashboard ===");
    println!("Total leads:     {}", render.total_leads);
    println!("Hot leads:       {}", render.hot_leads);
    println!("Warm leads:      {}", render.warm_leads);
    println!("Cold leads:      {}", render.cold_leads);
    println!("Average score:   {}", render.average_score);
    println!("Enriched leads:  {}", render.enriched_leads);
    println!("Enrichment rate: {}", render.enrichment_rate);

    println!("--- Lead distribution ---");
    if let Some(placeholder) = render.distribution_placeholder {
        println!("{}", placeholder);
    } else {
        for (tier, count) in &render.distribution {
            println!("{:>5}: {}", tier, count);
        }
    }
    if let Some(error) = render.error {
        println!("(!) {}", error);
    }
    println!();
}

async fn browse_leads(store: &QueryStore) -> anyhow::Result<()> {
    let mut view = LeadListView::new();

    let tiers: [(&str, Option<ScoreTier>); 4] = [
        ("All tiers", None),
        ("Hot", Some(ScoreTier::Hot)),
        ("Warm", Some(ScoreTier::Warm)),
        ("Cold", Some(ScoreTier::Cold)),
    ];
    let tier_choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Tier filter")
        .items(&tiers.map(|(label, _)| label))
        .default(0)
        .interact()?;
    view.set_tier(tiers[tier_choice].1);

    let search: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Search (email/company, empty for all)")
        .allow_empty(true)
        .interact_text()?;
    view.set_search(search);

    if let Err(e) = store.leads(&view.filter()).await {
        tracing::warn!("Lead list fetch failed: {}", e);
    }

    let state = store.leads_state(&view.filter()).await;
    let ids: Vec<String> = match view.render(&state) {
        ListRender::Loading => {
            println!("Loading...");
            return Ok(());
        }
        ListRender::Empty => {
            println!("No leads found");
            return Ok(());
        }
        ListRender::Error { message, visible } => {
            println!("(!) {}", message);
            print_leads(store, &visible);
            visible.iter().map(|l| l.id.clone()).collect()
        }
        ListRender::Leads(leads) => {
            print_leads(store, &leads);
            leads.iter().map(|l| l.id.clone()).collect()
        }
    };

    if ids.is_empty() {
        return Ok(());
    }

    let mut items: Vec<String> = ids.iter().map(|id| format!("Act on lead {}", id)).collect();
    items.push("Back".to_string());
    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select a lead")
        .items(&items)
        .default(items.len() - 1)
        .interact()?;
    if choice == items.len() - 1 {
        return Ok(());
    }

    lead_actions(store, &ids[choice]).await?;
    Ok(())
}

fn print_leads(store: &QueryStore, leads: &[&lead_console::models::Lead]) {
    use lead_console::query_store::{MutationKind, MutationState};

    for lead in leads {
        let scoring =
            store.mutation_state(MutationKind::Score, &lead.id) == MutationState::Pending;
        let enriching =
            store.mutation_state(MutationKind::Enrich, &lead.id) == MutationState::Pending;
        let card = views::lead_card(lead, scoring, enriching);

        let mut header = card.title.clone();
        if let Some(badge) = card.tier_badge {
            header.push_str(&format!(" [{}]", badge));
        }
        if let Some(score) = &card.score_label {
            header.push_str(&format!(" ({})", score));
        }
        println!("* {}", header);
        println!("  {}", card.contact_line);
        if let Some(reasoning) = &card.reasoning {
            println!("  {}", reasoning);
        }
    }
}

async fn lead_actions(store: &QueryStore, id: &str) -> anyhow::Result<()> {
    let action = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Lead {}", id))
        .items(&["Score", "Enrich", "View detail", "Back"])
        .default(3)
        .interact()?;

    match action {
        0 => match store.score_lead(id).await {
            Ok(MutationOutcome::Completed(lead)) => {
                println!(
                    "Scored: {} -> {} ({})",
                    lead.email,
                    lead.score.round(),
                    lead.score_tier.map(|t| t.as_str()).unwrap_or("unscored")
                );
            }
            Ok(MutationOutcome::AlreadyPending) => println!("Scoring already in progress"),
            Err(e) => println!("(!) {}", e),
        },
        1 => match store.enrich_lead(id).await {
            Ok(MutationOutcome::Completed(lead)) => {
                println!("Enriched: {} (intent score {})", lead.email, lead.intent_score);
            }
            Ok(MutationOutcome::AlreadyPending) => println!("Enrichment already in progress"),
            Err(e) => println!("(!) {}", e),
        },
        2 => match store.lead(id).await {
            Ok(lead) => {
                println!("{:#?}", lead);
                if !lead.enrichment_data.is_null() {
                    println!(
                        "enrichment_data: {}",
                        serde_json::to_string_pretty(&lead.enrichment_data)?
                    );
                }
            }
            Err(e) => println!("(!) {}", e),
        },
        _ => {}
    }
    Ok(())
}

async fn add_lead(store: &QueryStore) -> anyhow::Result<()> {
    let mut form = LeadForm::open();

    form.email = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Email")
        .interact_text()?;
    form.first_name = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("First name")
        .allow_empty(true)
        .interact_text()?;
    form.last_name = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Last name")
        .allow_empty(true)
        .interact_text()?;
    form.company = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Company")
        .allow_empty(true)
        .interact_text()?;
    form.job_title = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Job title")
        .allow_empty(true)
        .interact_text()?;

    let sources = LeadSource::all();
    let source_choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Source")
        .items(&sources.iter().map(|s| s.as_str()).collect::<Vec<_>>())
        .default(0)
        .interact()?;
    form.source = Some(sources[source_choice]);

    match form.submit(store).await {
        FormSubmit::Created(lead) => {
            println!("Created lead {} ({})", lead.email, lead.id);
        }
        FormSubmit::Rejected => {
            if let Some(error) = &form.error {
                println!("(!) {}", error);
            }
            println!("Draft kept; fix the problem and submit again.");
        }
    }
    Ok(())
}

async fn show_analytics(client: &LeadApiClient) {
    match client.get_analytics().await {
        Ok(payload) => match serde_json::to_string_pretty(&payload) {
            Ok(text) => println!("{}", text),
            Err(e) => println!("(!) Unrenderable analytics payload: {}", e),
        },
        Err(e) => println!("(!) {}", e),
    }
}
