fn main() {
    ui::logs::init_logging();
    yew::Renderer::<ui::App>::new().render();
}
