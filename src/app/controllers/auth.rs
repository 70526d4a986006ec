use std::sync::Arc;

use crate::app::accounts::{is_valid_email, validate_registration, NewAccount};
use crate::app::controllers::page;
use crate::app::views::{csrf_field, escape, input};
use crate::app::AppServices;
use crate::dispatch::{action, HandlerError, HandlerRegistry};
use crate::http::{Request, Response};
use crate::middleware::auth::INTENDED_URL_KEY;

const INVALID_REQUEST: &str = "Invalid request. Please try again.";
const RECOVERY_SENT: &str = "If the email exists, a password reset link has been sent";

fn login_form(req: &mut Request) -> String {
    let session = req.session_mut();
    let token = session.csrf_token();
    let email = session.take_old_input("email");
    format!(
        "<h1>Login</h1>\n<form method=\"post\" action=\"/login\">\n{}{}{}<button type=\"submit\">Login</button>\n</form>\n<p><a href=\"/password-recovery\">Forgot your password?</a></p>\n",
        csrf_field(&token),
        input("email", "email", "Email", &email),
        input("password", "password", "Password", ""),
    )
}

fn register_form(req: &mut Request, errors: &[&str]) -> String {
    let session = req.session_mut();
    let token = session.csrf_token();
    let first_name = session.take_old_input("first_name");
    let last_name = session.take_old_input("last_name");
    let email = session.take_old_input("email");

    let mut content = String::from("<h1>Register</h1>\n");
    if !errors.is_empty() {
        content.push_str("<ul class=\"errors\">\n");
        for error in errors {
            content.push_str(&format!("<li>{}</li>\n", escape(error)));
        }
        content.push_str("</ul>\n");
    }
    content.push_str("<form method=\"post\" action=\"/register\">\n");
    content.push_str(&csrf_field(&token));
    content.push_str(&input("text", "first_name", "First name", &first_name));
    content.push_str(&input("text", "last_name", "Last name", &last_name));
    content.push_str(&input("email", "email", "Email", &email));
    content.push_str(&input("password", "password", "Password", ""));
    content.push_str(&input("password", "confirm_password", "Confirm password", ""));
    content.push_str("<button type=\"submit\">Register</button>\n</form>\n");
    content
}

fn recovery_form(req: &mut Request) -> String {
    let session = req.session_mut();
    let token = session.csrf_token();
    let email = session.take_old_input("email");
    format!(
        "<h1>Password recovery</h1>\n<form method=\"post\" action=\"/password-recovery\">\n{}{}<button type=\"submit\">Send reset link</button>\n</form>\n",
        csrf_field(&token),
        input("email", "email", "Email", &email),
    )
}

/// Reject the POST unless it carries this session's CSRF token.
fn check_csrf(req: &mut Request, back_to: &str) -> Option<Response> {
    let submitted = req.form("csrf_token").map(str::to_string);
    if req.session().verify_csrf(submitted.as_deref()) {
        return None;
    }
    tracing::warn!(request_id = %req.request_id(), uri = %req.uri(), "CSRF token mismatch");
    req.session_mut().flash("error", INVALID_REQUEST);
    Some(Response::redirect(back_to))
}

fn attempt_login(services: &AppServices, req: &mut Request) -> Response {
    if !req.is_post() {
        return Response::redirect("/login");
    }
    if let Some(res) = check_csrf(req, "/login") {
        return res;
    }

    let email = req.form_or_empty("email");
    let password = req.form("password").unwrap_or_default().to_string();
    req.session_mut().set_old_input([("email", email.clone())]);

    let failure = if email.is_empty() || password.is_empty() {
        Some("Email and password are required")
    } else if !services.accounts.verify(&email, &password) {
        Some("Invalid email or password")
    } else {
        None
    };

    if let Some(message) = failure {
        tracing::info!(request_id = %req.request_id(), "Login rejected");
        req.session_mut().flash("error", message);
        return Response::redirect("/login");
    }

    tracing::info!(request_id = %req.request_id(), "Login succeeded");
    let session = req.session_mut();
    session.regenerate();
    session.set_user(email);
    session.clear_old_input();
    let target = session
        .remove(INTENDED_URL_KEY)
        .unwrap_or_else(|| "/home".to_string());
    Response::redirect(&target)
}

fn register_account(services: &AppServices, req: &mut Request) -> Response {
    if !req.is_post() {
        return Response::redirect("/register");
    }
    if let Some(res) = check_csrf(req, "/register") {
        return res;
    }

    let account = NewAccount {
        first_name: req.form_or_empty("first_name"),
        last_name: req.form_or_empty("last_name"),
        email: req.form_or_empty("email"),
        password: req.form("password").unwrap_or_default().to_string(),
    };
    let confirm = req.form("confirm_password").unwrap_or_default().to_string();

    req.session_mut().set_old_input([
        ("first_name", account.first_name.clone()),
        ("last_name", account.last_name.clone()),
        ("email", account.email.clone()),
    ]);

    let mut errors = validate_registration(&account, &confirm);
    if !account.email.is_empty() && services.accounts.exists(&account.email) {
        errors.push("Email already exists");
    }
    if errors.is_empty() {
        if let Err(e) = services.accounts.register(account) {
            tracing::info!(request_id = %req.request_id(), error = %e, "Registration rejected");
            errors.push("Email already exists");
        }
    }

    if !errors.is_empty() {
        let content = register_form(req, &errors);
        return page(services, req, "Register", &content);
    }

    let session = req.session_mut();
    session.clear_old_input();
    session.flash("success", "Registration successful! You can now log in.");
    Response::redirect("/login")
}

fn recover_password(req: &mut Request) -> Response {
    if !req.is_post() {
        return Response::redirect("/password-recovery");
    }
    if let Some(res) = check_csrf(req, "/password-recovery") {
        return res;
    }

    let email = req.form_or_empty("email");
    let session = req.session_mut();
    if email.is_empty() || !is_valid_email(&email) {
        session.set_old_input([("email", email)]);
        session.flash("error", "Please provide a valid email address");
    } else {
        // Same answer whether or not the account exists.
        session.clear_old_input();
        session.flash("success", RECOVERY_SENT);
    }
    Response::redirect("/password-recovery")
}

/// Show a guest-only form, sending authenticated users home.
fn guest_page(
    services: &AppServices,
    req: &mut Request,
    title: &str,
    form: impl Fn(&mut Request) -> String,
) -> Result<Response, HandlerError> {
    if req.session().is_authenticated() {
        return Ok(Response::redirect("/home"));
    }
    let content = form(req);
    Ok(page(services, req, title, &content))
}

pub fn register(registry: &mut HandlerRegistry, services: &Arc<AppServices>) {
    let svc = services.clone();
    registry.register_action(
        "AuthController",
        "showLogin",
        action(0, move |req, _| guest_page(&svc, req, "Login", login_form)),
    );

    let svc = services.clone();
    registry.register_action(
        "AuthController",
        "login",
        action(0, move |req, _| Ok(attempt_login(&svc, req))),
    );

    let svc = services.clone();
    registry.register_action(
        "AuthController",
        "showRegister",
        action(0, move |req, _| guest_page(&svc, req, "Register", |r| register_form(r, &[]))),
    );

    let svc = services.clone();
    registry.register_action(
        "AuthController",
        "register",
        action(0, move |req, _| Ok(register_account(&svc, req))),
    );

    let svc = services.clone();
    registry.register_action(
        "AuthController",
        "showPasswordRecovery",
        action(0, move |req, _| guest_page(&svc, req, "Password recovery", recovery_form)),
    );

    registry.register_action(
        "AuthController",
        "recoverPassword",
        action(0, |req, _| Ok(recover_password(req))),
    );

    registry.register_action(
        "AuthController",
        "logout",
        action(0, |req, _| {
            let session = req.session_mut();
            session.destroy();
            session.restart();
            session.flash("success", "You have been logged out successfully.");
            Ok(Response::redirect("/"))
        }),
    );
}
