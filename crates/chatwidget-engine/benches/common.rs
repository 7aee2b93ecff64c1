// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_reply(items: usize, bullets: usize) -> String {
    let mut reply = String::from("Here is what we have on the **menu** today:\n\n");
    for item in 1..=items {
        reply.push_str(&format!("{item}. **Dish {item}** with a short description\n"));
        for bullet in 0..bullets {
            reply.push_str(&format!("- Option {bullet}: *seasonal* side\n"));
        }
    }
    reply.push_str("\nLet me know if you would like to order.\n");
    reply
}

#[allow(dead_code)]
pub fn generate_markup(items: usize) -> String {
    let mut markup = String::from("<h2>Menu</h2><ol>");
    for item in 0..items {
        markup.push_str(&format!(
            "<li><strong>Dish {item}</strong> &amp; sides<ul><li>small</li><li>large</li></ul></li>"
        ));
    }
    markup.push_str("</ol><p>Enjoy!</p>");
    markup
}
