use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use triage_core::config::{data_dir_from_env_value, delay_from_env_value};
use triage_core::constants::{
    DEFAULT_CONSULT_DELAY_MS, DEFAULT_PROFILE_DELAY_MS, DEFAULT_REPLY_DELAY_MS, ENV_CONSULT_DELAY_MS,
    ENV_DATA_DIR, ENV_PROFILE_DELAY_MS, ENV_REPLY_DELAY_MS,
};
use triage_core::{
    AssessmentStore, CoreConfig, Notice, NoticeKind, PatientProfile, ProfileForm, Reply,
    RequiredField, TriageResult, TriageSession,
};

/// Main entry point for the guided triage session
///
/// Walks one patient through intake and the triage chat on stdin/stdout, then offers to
/// save the assessment or proceed to a (simulated) teleconsultation.
///
/// # Environment Variables
/// - `TRIAGE_DATA_DIR`: directory for the saved assessment (default: "triage_data")
/// - `TRIAGE_REPLY_DELAY_MS`: pause before each assistant reply (default: 1200)
/// - `TRIAGE_PROFILE_DELAY_MS`: pause after profile submission (default: 1000)
/// - `TRIAGE_CONSULT_DELAY_MS`: pause before the consultation-ready notice (default: 2000)
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("triage=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cfg = Arc::new(config_from_env()?);
    tracing::info!("++ Starting triage session (store: {})", cfg.data_dir().display());

    let input = BufReader::new(tokio::io::stdin());
    let mut output = std::io::stdout();
    run(cfg, input, &mut output).await
}

fn config_from_env() -> anyhow::Result<CoreConfig> {
    let env = |name: &str| std::env::var(name).ok();

    let cfg = CoreConfig::new(
        data_dir_from_env_value(env(ENV_DATA_DIR)),
        delay_from_env_value(ENV_REPLY_DELAY_MS, env(ENV_REPLY_DELAY_MS), DEFAULT_REPLY_DELAY_MS)?,
        delay_from_env_value(
            ENV_PROFILE_DELAY_MS,
            env(ENV_PROFILE_DELAY_MS),
            DEFAULT_PROFILE_DELAY_MS,
        )?,
        delay_from_env_value(
            ENV_CONSULT_DELAY_MS,
            env(ENV_CONSULT_DELAY_MS),
            DEFAULT_CONSULT_DELAY_MS,
        )?,
    )?;
    Ok(cfg)
}

struct Console<R, W> {
    lines: Lines<R>,
    out: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    /// Print `label` and read one line. `None` on end of input.
    async fn ask(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        write!(self.out, "{}", label)?;
        self.out.flush()?;
        Ok(self.lines.next_line().await?)
    }

    fn say(&mut self, text: impl std::fmt::Display) -> anyhow::Result<()> {
        writeln!(self.out, "{}", text)?;
        Ok(())
    }

    fn notice(&mut self, notice: &Notice) -> anyhow::Result<()> {
        let marker = match notice.kind {
            NoticeKind::Info => "*",
            NoticeKind::Error => "!",
        };
        self.say(format_args!("[{}] {}", marker, notice))
    }
}

/// Drive one full session. Returns when the user quits or input ends.
async fn run<R, W>(cfg: Arc<CoreConfig>, input: R, output: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut console = Console {
        lines: input.lines(),
        out: output,
    };

    console.say("Arogya Sevak: Patient Profile Creation (Step 1 of 2)")?;
    console.say("Fields marked * are required.")?;

    let Some(profile) = intake(&mut console, &cfg).await? else {
        return Ok(());
    };

    let mut session = TriageSession::for_patient(profile);
    if let Some(patient) = session.patient() {
        console.say(format_args!("\nHealth Assessment Session | {}", patient.summary()))?;
    }
    let greeting = session.messages()[0].text.clone();
    console.say(format_args!("Assistant: {}", greeting))?;

    let result = loop {
        let Some(line) = console.ask("You: ").await? else {
            return Ok(());
        };
        if !session.can_send(&line) {
            continue;
        }

        console.say("  (Analyzing symptoms...)")?;
        tokio::time::sleep(cfg.reply_delay()).await;

        match session.send(&line)? {
            Some(Reply::Question(message)) => {
                console.say(format_args!("Assistant: {}", message.text))?;
            }
            Some(Reply::Assessment {
                message,
                result,
                notice,
            }) => {
                console.say(format_args!("Assistant: {}", message.text))?;
                console.notice(&notice)?;
                break result;
            }
            None => {}
        }
    };

    render_result(&mut console, &result)?;
    after_assessment(&mut console, &cfg, &session).await
}

async fn intake<R, W>(
    console: &mut Console<R, W>,
    cfg: &CoreConfig,
) -> anyhow::Result<Option<PatientProfile>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut form = ProfileForm::new();

    macro_rules! field {
        ($label:expr, $slot:expr) => {
            match console.ask($label).await? {
                Some(value) => $slot = value,
                None => return Ok(None),
            }
        };
    }

    field!("Full Name *: ", form.name);
    field!("Age *: ", form.age);
    field!("Gender * (male/female/other): ", form.gender);
    field!("Phone Number *: ", form.phone);
    field!("Address: ", form.address);
    field!("Emergency Contact: ", form.emergency_contact);
    field!("Medical History: ", form.medical_history);
    field!("Current Medications: ", form.current_medications);
    field!("Known Allergies: ", form.allergies);

    loop {
        let mut submitted = None;
        match form.submit(|profile| submitted = Some(profile)) {
            Ok(notice) => {
                tokio::time::sleep(cfg.profile_delay()).await;
                console.notice(&notice)?;
                return Ok(submitted);
            }
            Err(e) => {
                console.notice(&e.notice())?;
                tracing::debug!(error = %e, "re-prompting profile fields");
                for field in form.missing_required() {
                    let label = format!("{} *: ", field.label());
                    match field {
                        RequiredField::Name => field!(&label, form.name),
                        RequiredField::Age => field!(&label, form.age),
                        RequiredField::Gender => field!(&label, form.gender),
                        RequiredField::Phone => field!(&label, form.phone),
                    }
                }
                if form.is_complete() && form.validate().is_err() {
                    // complete but rejected (unrecognised gender)
                    field!("Gender * (male/female/other): ", form.gender);
                }
            }
        }
    }
}

fn render_result<R, W>(console: &mut Console<R, W>, result: &TriageResult) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    console.say("")?;
    console.say(format_args!(
        "== {} [{}] ({}% Confidence)",
        result.condition,
        result.severity.as_str().to_uppercase(),
        result.confidence
    ))?;
    console.say(format_args!("   {}", result.urgency))?;
    console.say(format_args!("Recommendation: {}", result.recommendation))?;
    console.say("Next Steps:")?;
    for step in &result.next_steps {
        console.say(format_args!("  - {}", step))?;
    }
    Ok(())
}

async fn after_assessment<R, W>(
    console: &mut Console<R, W>,
    cfg: &Arc<CoreConfig>,
    session: &TriageSession,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let store = AssessmentStore::new(cfg.clone());
    let plan = session.teleconsultation()?;

    loop {
        let prompt = format!("\n[s] Save Assessment  [c] {}  [q] Quit: ", plan.action_label);
        let Some(choice) = console.ask(&prompt).await? else {
            return Ok(());
        };

        match choice.trim().to_ascii_lowercase().as_str() {
            "s" | "save" => match session.save(&store) {
                Ok(notice) => console.notice(&notice)?,
                Err(e) => {
                    tracing::error!("save assessment error: {:?}", e);
                    console.notice(&Notice::error("Save Failed", e.to_string()))?;
                }
            },
            "c" | "consult" => {
                console.notice(&plan.initiating)?;
                tokio::time::sleep(cfg.consult_delay()).await;
                console.notice(&plan.ready)?;
            }
            "q" | "quit" => return Ok(()),
            _ => {}
        }
    }
}
