use media_diagram::App;

fn main() {
	media_diagram::init_logging();
	leptos::mount::mount_to_body(App)
}
