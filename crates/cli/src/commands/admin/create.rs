//! `admin create` - create an admin account.
//!
//! Without arguments the command asks for name, email and password, shows
//! each step as it runs and re-reads the account afterwards. With exactly
//! three arguments it runs without prompts or verification.

use std::io::{self, Write};

use longeviva_admin::services::{
    AdminAccountError, AdminAccountService, CreateProgress, CreatedAdmin,
};
use longeviva_core::{MIN_PASSWORD_LENGTH, NewAdmin};

use super::rule;
use crate::console::Console;

const USAGE: &str = "Uso: lv-cli admin create \"Nome Cognome\" \"email@example.com\" \"password\"";
const USAGE_INTERACTIVE: &str = "Oppure: lv-cli admin create (per modalità interattiva)";
const MASKED_PASSWORD: &str = "********";

/// How the command collects its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateMode {
    Interactive,
    Direct {
        name: String,
        email: String,
        password: String,
    },
}

impl CreateMode {
    /// Pick the mode from the positional arguments: none for interactive,
    /// exactly three for direct. Anything else is a usage error.
    ///
    /// # Errors
    ///
    /// Returns the number of arguments given when it is neither 0 nor 3.
    pub fn from_args(args: &[String]) -> Result<Self, usize> {
        match args {
            [] => Ok(Self::Interactive),
            [name, email, password] => Ok(Self::Direct {
                name: name.clone(),
                email: email.clone(),
                password: password.clone(),
            }),
            other => Err(other.len()),
        }
    }
}

/// Options of `admin create`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateOptions {
    /// Print the plaintext password in the final receipt.
    pub show_password: bool,
}

/// Print the usage error for a wrong number of arguments.
///
/// # Errors
///
/// Returns an error if writing to the console fails.
pub fn print_usage(console: &mut Console<'_>, given: usize) -> io::Result<()> {
    if given < 3 {
        writeln!(console.err, "❌ Parametri insufficienti!")?;
    } else {
        writeln!(console.err, "❌ Troppi parametri!")?;
    }
    writeln!(console.err, "{USAGE}")?;
    writeln!(console.err, "{USAGE_INTERACTIVE}")
}

/// Run `admin create`. Flow failures are reported on the console, not
/// returned.
///
/// # Errors
///
/// Returns an error only if console I/O fails.
pub async fn run(
    service: &AdminAccountService<'_>,
    mode: CreateMode,
    options: CreateOptions,
    console: &mut Console<'_>,
) -> io::Result<()> {
    match mode {
        CreateMode::Interactive => interactive(service, options, console).await,
        CreateMode::Direct {
            name,
            email,
            password,
        } => direct(service, &name, &email, &password, options, console).await,
    }
}

fn shown_password(admin: &NewAdmin, options: CreateOptions) -> &str {
    if options.show_password {
        admin.password()
    } else {
        MASKED_PASSWORD
    }
}

async fn interactive(
    service: &AdminAccountService<'_>,
    options: CreateOptions,
    console: &mut Console<'_>,
) -> io::Result<()> {
    writeln!(console.out, "🚀 Creazione Admin per Longeviva\n")?;

    let name = console.ask("Nome completo dell'admin: ")?;
    let email = console.ask("Email: ")?;
    let password = console.ask(&format!("Password (min {MIN_PASSWORD_LENGTH} caratteri): "))?;

    let admin = match NewAdmin::validate(&name, &email, &password) {
        Ok(admin) => admin,
        Err(err) => return report_interactive_error(console, &err.into()),
    };

    writeln!(console.out, "\n⏳ Creazione admin in corso...\n")?;

    let out = &mut *console.out;
    let created = service
        .create_observed(&admin, &mut |step: CreateProgress| {
            // Progress lines are best effort
            let _ = print_progress(&mut *out, &step);
        })
        .await;

    let created = match created {
        Ok(created) => created,
        Err(err) => return report_interactive_error(console, &err),
    };

    writeln!(console.out, "\n4️⃣ Verifica creazione...")?;
    let report = match service.verify(&created.uid).await {
        Ok(report) => report,
        Err(err) => return report_interactive_error(console, &err),
    };

    if report.is_complete() {
        writeln!(console.out, "   ✅ Verifica completata con successo!")?;
        print_receipt(console, &created, shown_password(&admin, options))
    } else {
        let mark = |ok: bool| if ok { "✅" } else { "❌" };
        writeln!(console.out, "   ⚠️  Attenzione: Verifica parzialmente fallita")?;
        writeln!(console.out, "   Admin claims: {}", mark(report.claims))?;
        writeln!(console.out, "   Admin profile: {}", mark(report.profile))?;
        writeln!(console.out, "   Admin doc: {}", mark(report.legacy))
    }
}

fn print_progress(out: &mut (dyn Write + Send), step: &CreateProgress) -> io::Result<()> {
    match step {
        CreateProgress::CreatingIdentity => {
            writeln!(out, "1️⃣ Creazione utente in Firebase Auth...")
        }
        CreateProgress::IdentityCreated(uid) => {
            writeln!(out, "   ✅ Utente creato con UID: {uid}")
        }
        CreateProgress::AssigningClaims => writeln!(out, "\n2️⃣ Impostazione permessi admin..."),
        CreateProgress::ClaimsAssigned => writeln!(out, "   ✅ Permessi admin assegnati"),
        CreateProgress::WritingDocuments => {
            writeln!(out, "\n3️⃣ Creazione documenti in admin_profiles e admins...")
        }
        CreateProgress::DocumentsWritten => {
            writeln!(out, "   ✅ Documenti creati in admin_profiles e admins")
        }
    }
}

fn print_receipt(console: &mut Console<'_>, created: &CreatedAdmin, password: &str) -> io::Result<()> {
    let out = &mut *console.out;
    writeln!(out, "\n{}", rule('='))?;
    writeln!(out, "🎉 ADMIN CREATO CON SUCCESSO!")?;
    writeln!(out, "{}", rule('='))?;
    writeln!(out, "\n📋 Riepilogo:")?;
    writeln!(out, "   Nome: {}", created.name)?;
    writeln!(out, "   Email: {}", created.email)?;
    writeln!(out, "   Password: {password}")?;
    writeln!(out, "   UID: {}", created.uid)?;
    writeln!(
        out,
        "\n✨ Ora puoi accedere all'app Longeviva Admin con queste credenziali!"
    )?;
    writeln!(out, "{}\n", rule('='))
}

fn report_interactive_error(console: &mut Console<'_>, err: &AdminAccountError) -> io::Result<()> {
    let out = &mut *console.err;
    writeln!(out, "\n❌ Errore durante la creazione admin:")?;
    writeln!(out, "   {err}")?;
    if matches!(err, AdminAccountError::DuplicateIdentity) {
        writeln!(out, "   Usa un'email diversa o elimina l'utente esistente.")?;
    }
    writeln!(
        out,
        "\n💡 Suggerimento: Controlla i log sopra per maggiori dettagli.\n"
    )
}

async fn direct(
    service: &AdminAccountService<'_>,
    name: &str,
    email: &str,
    password: &str,
    options: CreateOptions,
    console: &mut Console<'_>,
) -> io::Result<()> {
    writeln!(console.out, "🚀 Creazione Admin per Longeviva (modalità diretta)\n")?;

    let admin = match NewAdmin::validate(name, email, password) {
        Ok(admin) => admin,
        Err(err) => return writeln!(console.err, "\n❌ Errore: {err}"),
    };

    writeln!(
        console.out,
        "📝 Creazione admin per: {} ({})\n",
        admin.name, admin.email
    )?;

    match service.create(&admin).await {
        Ok(created) => {
            writeln!(console.out, "\n✅ Admin creato con successo!")?;
            writeln!(console.out, "   UID: {}", created.uid)?;
            writeln!(console.out, "   Email: {}", created.email)?;
            writeln!(
                console.out,
                "   Password: {}\n",
                shown_password(&admin, options)
            )
        }
        Err(err) => writeln!(console.err, "\n❌ Errore: {err}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::console::{Captured, ScriptedPrompt};
    use longeviva_admin::firebase::{InMemoryFirebase, IdentityProvider};
    use longeviva_admin::models::admin_account::{legacy_path, profile_path};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_mode_from_args() {
        assert_eq!(CreateMode::from_args(&[]), Ok(CreateMode::Interactive));
        assert_eq!(
            CreateMode::from_args(&args(&["Mario", "m@l.it", "password123"])),
            Ok(CreateMode::Direct {
                name: "Mario".into(),
                email: "m@l.it".into(),
                password: "password123".into(),
            })
        );
        assert_eq!(CreateMode::from_args(&args(&["Mario"])), Err(1));
        assert_eq!(CreateMode::from_args(&args(&["Mario", "m@l.it"])), Err(2));
        assert_eq!(CreateMode::from_args(&args(&["a", "b", "c", "d"])), Err(4));
    }

    #[test]
    fn test_usage_message() {
        let mut prompt = ScriptedPrompt::default();
        let mut captured = Captured::default();
        print_usage(&mut captured.console(&mut prompt), 2).unwrap();

        let stderr = captured.stderr();
        assert!(stderr.contains("Parametri insufficienti"));
        assert!(stderr.contains(USAGE));
    }

    #[tokio::test]
    async fn test_interactive_create_masks_password() {
        let firebase = InMemoryFirebase::new();
        let service = AdminAccountService::new(&firebase, &firebase);
        let mut prompt = ScriptedPrompt::new([" Mario Rossi ", "mario@longeviva.it", "password123"]);
        let mut captured = Captured::default();

        run(
            &service,
            CreateMode::Interactive,
            CreateOptions::default(),
            &mut captured.console(&mut prompt),
        )
        .await
        .unwrap();

        let stdout = captured.stdout();
        assert!(stdout.contains("Utente creato con UID"));
        assert!(stdout.contains("Verifica completata con successo"));
        assert!(stdout.contains("Nome: Mario Rossi"));
        assert!(stdout.contains("Password: ********"));
        assert!(!stdout.contains("password123"));
        assert_eq!(prompt.asked.len(), 3);

        let user = firebase.get_user_by_email("mario@longeviva.it").await.unwrap();
        assert!(user.is_admin());
        assert!(firebase.document(&profile_path(&user.uid)).await.is_some());
        assert!(firebase.document(&legacy_path(&user.uid)).await.is_some());
    }

    #[tokio::test]
    async fn test_show_password_restores_receipt() {
        let firebase = InMemoryFirebase::new();
        let service = AdminAccountService::new(&firebase, &firebase);
        let mut prompt = ScriptedPrompt::default();
        let mut captured = Captured::default();

        run(
            &service,
            CreateMode::Direct {
                name: "Mario Rossi".into(),
                email: "mario@longeviva.it".into(),
                password: "password123".into(),
            },
            CreateOptions {
                show_password: true,
            },
            &mut captured.console(&mut prompt),
        )
        .await
        .unwrap();

        let stdout = captured.stdout();
        assert!(stdout.contains("Admin creato con successo"));
        assert!(stdout.contains("Password: password123"));
        assert!(prompt.asked.is_empty());
    }

    #[tokio::test]
    async fn test_validation_failure_makes_no_remote_calls() {
        let firebase = InMemoryFirebase::new();
        let service = AdminAccountService::new(&firebase, &firebase);
        let mut prompt = ScriptedPrompt::new(["Mario", "mario.longeviva.it", "password123"]);
        let mut captured = Captured::default();

        run(
            &service,
            CreateMode::Interactive,
            CreateOptions::default(),
            &mut captured.console(&mut prompt),
        )
        .await
        .unwrap();

        assert!(captured.stderr().contains("Email non valida"));
        assert_eq!(firebase.remote_calls().await, 0);
    }

    #[tokio::test]
    async fn test_direct_mode_rejects_email_without_at() {
        let firebase = InMemoryFirebase::new();
        let service = AdminAccountService::new(&firebase, &firebase);
        let mut prompt = ScriptedPrompt::default();
        let mut captured = Captured::default();

        run(
            &service,
            CreateMode::Direct {
                name: "Mario".into(),
                email: "mario".into(),
                password: "password123".into(),
            },
            CreateOptions::default(),
            &mut captured.console(&mut prompt),
        )
        .await
        .unwrap();

        assert!(captured.stderr().contains("❌ Errore: Email non valida"));
        assert_eq!(firebase.remote_calls().await, 0);
    }

    #[tokio::test]
    async fn test_duplicate_email_hint() {
        let firebase = InMemoryFirebase::new();
        let service = AdminAccountService::new(&firebase, &firebase);
        let admin = NewAdmin::validate("Mario", "mario@longeviva.it", "password123").unwrap();
        service.create(&admin).await.unwrap();

        let mut prompt = ScriptedPrompt::new(["Mario", "mario@longeviva.it", "password123"]);
        let mut captured = Captured::default();
        run(
            &service,
            CreateMode::Interactive,
            CreateOptions::default(),
            &mut captured.console(&mut prompt),
        )
        .await
        .unwrap();

        let stderr = captured.stderr();
        assert!(stderr.contains("già registrata"));
        assert!(stderr.contains("Usa un'email diversa"));
    }

    #[tokio::test]
    async fn test_failed_batch_stops_before_verification() {
        let firebase = InMemoryFirebase::new();
        firebase.fail_commits(true).await;
        let service = AdminAccountService::new(&firebase, &firebase);
        let mut prompt = ScriptedPrompt::new(["Mario", "mario@longeviva.it", "password123"]);
        let mut captured = Captured::default();

        run(
            &service,
            CreateMode::Interactive,
            CreateOptions::default(),
            &mut captured.console(&mut prompt),
        )
        .await
        .unwrap();

        // The batch failed, so the flow stops before verification
        assert!(captured.stderr().contains("Errore Firestore"));
        assert!(!captured.stdout().contains("Verifica creazione"));
        assert_eq!(firebase.user_count().await, 1);
    }
}
