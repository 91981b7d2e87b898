//! `admin list` - print every identity carrying admin claims.

use std::io::{self, Write};

use chrono::{DateTime, Local, Utc};
use longeviva_admin::services::AdminAccountService;
use longeviva_core::IdentityRecord;

use super::rule;
use crate::console::Console;

const TIME_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

/// Run `admin list`. Flow failures are reported on the console, not
/// returned.
///
/// # Errors
///
/// Returns an error only if console I/O fails.
pub async fn run(service: &AdminAccountService<'_>, console: &mut Console<'_>) -> io::Result<()> {
    writeln!(console.out, "📋 Lista degli Admin esistenti:\n")?;

    let admins = match service.list_admins().await {
        Ok(admins) => admins,
        Err(err) => return writeln!(console.err, "❌ Errore: {err}"),
    };

    if admins.is_empty() {
        return writeln!(console.out, "❌ Nessun admin trovato nel sistema.");
    }

    writeln!(console.out, "Trovati {} admin:\n", admins.len())?;
    for admin in &admins {
        print_admin(&mut *console.out, admin)?;
    }
    writeln!(console.out, "{}", rule('-'))
}

fn local_time(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local).format(TIME_FORMAT).to_string()
}

fn print_admin(out: &mut (dyn Write + Send), admin: &IdentityRecord) -> io::Result<()> {
    writeln!(out, "{}", rule('-'))?;
    writeln!(out, "Nome: {}", admin.display_name.as_deref().unwrap_or("N/A"))?;
    writeln!(out, "Email: {}", admin.email.as_deref().unwrap_or_default())?;
    writeln!(out, "UID: {}", admin.uid)?;
    writeln!(
        out,
        "Email verificata: {}",
        if admin.email_verified { "✅" } else { "❌" }
    )?;
    writeln!(
        out,
        "Account disabilitato: {}",
        if admin.disabled { "❌" } else { "✅ Attivo" }
    )?;
    writeln!(out, "Creato: {}", local_time(admin.metadata.creation_time))?;
    writeln!(
        out,
        "Ultimo accesso: {}",
        admin
            .metadata
            .last_sign_in_time
            .map_or_else(|| "Mai".to_owned(), local_time)
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::console::{Captured, ScriptedPrompt};
    use chrono::TimeZone;
    use longeviva_admin::firebase::InMemoryFirebase;
    use longeviva_core::{AdminClaims, Uid, UserMetadata};

    fn record(uid: &str, name: Option<&str>, admin: bool) -> IdentityRecord {
        IdentityRecord {
            uid: Uid::new(uid),
            email: Some(format!("{uid}@longeviva.it")),
            display_name: name.map(ToOwned::to_owned),
            email_verified: true,
            disabled: false,
            metadata: UserMetadata {
                creation_time: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
                last_sign_in_time: None,
            },
            custom_claims: admin.then(|| AdminClaims::default().to_map()),
        }
    }

    #[tokio::test]
    async fn test_lists_only_admins() {
        let firebase = InMemoryFirebase::new();
        firebase.insert_user(record("anna", Some("Anna Bianchi"), true)).await;
        firebase.insert_user(record("luca", None, true)).await;
        firebase.insert_user(record("paolo", Some("Paolo"), false)).await;
        let service = AdminAccountService::new(&firebase, &firebase);
        let mut prompt = ScriptedPrompt::default();
        let mut captured = Captured::default();

        run(&service, &mut captured.console(&mut prompt)).await.unwrap();

        let stdout = captured.stdout();
        assert!(stdout.contains("Trovati 2 admin:"));
        assert!(stdout.contains("Nome: Anna Bianchi"));
        assert!(stdout.contains("Nome: N/A"));
        assert!(stdout.contains("Account disabilitato: ✅ Attivo"));
        assert!(stdout.contains("Ultimo accesso: Mai"));
        assert!(!stdout.contains("paolo@longeviva.it"));
        assert!(stdout.trim_end().ends_with(&rule('-')));
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let firebase = InMemoryFirebase::new();
        firebase.insert_user(record("paolo", Some("Paolo"), false)).await;
        let service = AdminAccountService::new(&firebase, &firebase);
        let mut prompt = ScriptedPrompt::default();
        let mut captured = Captured::default();

        run(&service, &mut captured.console(&mut prompt)).await.unwrap();

        assert!(captured.stdout().contains("Nessun admin trovato nel sistema"));
    }

    #[test]
    fn test_local_time_format() {
        let formatted = local_time(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 5).unwrap());
        // Day and time shift with the local zone; the shape does not
        assert_eq!(formatted.len(), "01/03/2024, 09:30:05".len());
        assert!(formatted.contains("/2024, "));
    }
}
