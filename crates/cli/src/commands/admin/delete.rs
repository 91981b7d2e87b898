//! `admin delete` - delete an admin after an explicit confirmation.

use std::io;

use longeviva_admin::services::AdminAccountService;
use longeviva_core::Confirmation;

use crate::console::Console;

/// Run `admin delete`. Flow failures are reported on the console, not
/// returned.
///
/// # Errors
///
/// Returns an error only if console I/O fails.
pub async fn run(service: &AdminAccountService<'_>, console: &mut Console<'_>) -> io::Result<()> {
    let email = console.ask("Email dell'admin da eliminare: ")?;

    let user = match service.find_by_email(&email).await {
        Ok(user) => user,
        Err(err) => return writeln!(console.err, "\n❌ Errore: {err}"),
    };

    writeln!(console.out, "\n⚠️  Stai per eliminare:")?;
    writeln!(
        console.out,
        "   Nome: {}",
        user.display_name.as_deref().unwrap_or("N/A")
    )?;
    writeln!(
        console.out,
        "   Email: {}",
        user.email.as_deref().unwrap_or(&email)
    )?;
    writeln!(console.out, "   UID: {}", user.uid)?;

    let answer = console.ask("\nSei sicuro? (yes/no): ")?;
    if !Confirmation::parse(&answer).is_confirmed() {
        return writeln!(console.out, "\n❌ Operazione annullata.");
    }

    match service.delete(&user.uid).await {
        Ok(()) => writeln!(console.out, "\n✅ Admin eliminato con successo!"),
        Err(err) => writeln!(console.err, "\n❌ Errore: {err}"),
    }
}
