//! A simulated installer walking through an assistant flow.
//!
//! Run with `RUST_LOG=horizon_assistant=debug` to watch the controller's
//! decisions.

use horizon_assistant::debug::FlowDebug;
use horizon_assistant::{Action, Assistant, AssistantConfig, Intent, PageKind, Transition};
use horizon_assistant_core::Propagation;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut assistant = Assistant::with_config(AssistantConfig::new().with_title("Installer"));

    let welcome = assistant
        .create_page()
        .with_kind(PageKind::Intro)
        .with_title("Welcome")
        .with_complete(true);
    let license = assistant.create_page().with_title("License");
    let confirm = assistant
        .create_page()
        .with_kind(PageKind::Confirm)
        .with_title("Ready to install")
        .with_complete(true);
    let progress = assistant
        .create_page()
        .with_kind(PageKind::Progress)
        .with_title("Installing");
    let summary = assistant
        .create_page()
        .with_kind(PageKind::Summary)
        .with_title("Done");

    let license_id = license.id();
    let progress_id = progress.id();
    for page in [welcome, license, confirm, progress, summary] {
        assistant.append_page(page)?;
    }

    assistant.prepare.connect(|t: &mut Transition| {
        println!("preparing page {} of {}", t.index() + 1, t.n_pages());
        Propagation::Continue
    });
    assistant.apply.connect(|_| println!("applying settings"));
    assistant.close.connect(|_| println!("installer closed"));

    assistant.map();
    println!("{}", FlowDebug::new().format(&assistant));

    assistant.deliver(Intent::Forward)?;
    println!(
        "forward offered on the license page: {}",
        assistant.action_state().is_available(Action::Forward)
    );

    // The user accepts the license
    assistant.set_page_complete(license_id, true)?;
    assistant.deliver(Intent::Forward)?;
    assistant.deliver(Intent::Apply)?;
    assistant.commit();

    if let Err(err) = assistant.deliver(Intent::Cancel) {
        println!("refused: {err}");
    }

    // The work finishes
    assistant.set_page_complete(progress_id, true)?;
    assistant.deliver(Intent::Forward)?;
    println!("window title: {}", assistant.window_title().unwrap_or_default());
    println!("{}", FlowDebug::new().format(&assistant));

    assistant.deliver(Intent::Close)?;
    Ok(())
}
