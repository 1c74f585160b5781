use rbac_acl::*;

fn main() -> Result<()> {
    env_logger::init();

    let mut acl = Acl::new();
    let none: &[&str] = &[];

    acl.add_role("guest", none)?;
    acl.add_role("staff", &["guest"])?;
    acl.add_role("editor", &["staff"])?;
    acl.add_role("admin", none)?;

    // guest may only view content
    acl.allow("guest", ALL, "view")?;

    // staff inherits view privilege from guest, but also needs additional privileges
    acl.allow("staff", ALL, ["edit", "submit", "revise"])?;

    // editor inherits view, edit, submit, and revise privileges from staff, but also needs
    // additional privileges
    acl.allow("editor", ALL, ["publish", "archive", "delete"])?;

    // admin inherits nothing, but is allowed all privileges
    acl.allow("admin", ALL, ALL)?;

    // marketing inherits from staff
    acl.add_role("marketing", &["staff"])?;

    acl.add_resource("newsletter", None)?;
    acl.add_resource("news", None)?;
    acl.add_resource("latest", Some("news"))?;
    acl.add_resource("anouncement", Some("news"))?;

    // marketing must be able to publish and archive newsletters and the latest news
    acl.allow("marketing", ["newsletter", "latest"], ["publish", "archive"])?;

    // staff (and marketing, by inheritance), are denied permission to revise the latest news
    acl.deny("staff", "latest", "revise")?;

    // everyone (including admins) are denied permission to archive news announcements
    acl.deny(ALL, "anouncement", "archive")?;

    let queries = [
        ("staff", "newsletter", "publish"),
        ("marketing", "newsletter", "publish"),
        ("marketing", "latest", "revise"),
        ("editor", "latest", "revise"),
        ("admin", "anouncement", "archive"),
    ];

    for (role, resource, privilege) in queries.iter() {
        let verdict = if acl.is_allowed(*role, *resource, *privilege)? { "allowed" } else { "denied" };

        println!("{:>9} {:<8} {:<12} {}", role, privilege, resource, verdict);
    } // for

    // a logged in user whose identity carries the marketing role
    let identity = SimpleIdentity::new(IdentityId::Str(String::from("jane")), vec!["marketing"]);
    let user     = User::new(AuthState::authenticated(std::sync::Arc::new(identity)), &acl);

    println!("jane may publish the latest news: {}", user.is_allowed("latest", "publish")?);

    Ok(())
} // main
