//! Minimal HTML for the account pages and the chat shell

use html_escape::encode_text;

fn layout(app_title: &str, heading: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title} - {heading}</title>
</head>
<body>
    <h1>{heading}</h1>
{body}
</body>
</html>
"#,
        title = encode_text(app_title),
        heading = heading,
        body = body
    )
}

fn error_block(error: Option<&str>) -> String {
    error
        .map(|e| format!("    <p class=\"error\">{}</p>\n", encode_text(e)))
        .unwrap_or_default()
}

pub fn signup_page(app_title: &str, error: Option<&str>) -> String {
    let body = format!(
        r#"{error}    <form method="post" action="/signup">
        <input type="email" name="email" placeholder="Email" required>
        <input type="text" name="username" placeholder="Username" required>
        <input type="password" name="password" placeholder="Password" required>
        <button type="submit">Sign up</button>
    </form>
    <p><a href="/login">Log in instead</a></p>"#,
        error = error_block(error)
    );
    layout(app_title, "Sign up", &body)
}

pub fn login_page(app_title: &str, error: Option<&str>) -> String {
    let body = format!(
        r#"{error}    <form method="post" action="/login">
        <input type="email" name="email" placeholder="Email" required>
        <input type="password" name="password" placeholder="Password" required>
        <button type="submit">Log in</button>
    </form>
    <p><a href="/signup">Create an account</a></p>"#,
        error = error_block(error)
    );
    layout(app_title, "Log in", &body)
}

pub fn chat_page(app_title: &str, username: &str) -> String {
    let body = format!(
        r#"    <p>Signed in as {username}. <a href="/logout">Log out</a></p>
    <div id="app"></div>"#,
        username = encode_text(username)
    );
    layout(app_title, "Chat", &body)
}
