mod app;

use std::env;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 800;

#[show_image::main]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Default values.
    let mut asset_path = String::from("assets/african_head");
    let mut mode_name = String::from("lit");
    let mut print_fps = false;

    let args: Vec<String> = env::args().collect();
    for i in 1..args.len() {
        match args[i].as_str() {
            "-p" => asset_path = args[i + 1].clone(),
            "-m" => mode_name = args[i + 1].clone(),
            "--fps" => print_fps = true,
            _ => (),
        }
    }

    let params = app::Params {
        width: WIDTH,
        height: HEIGHT,
        print_fps,
        asset_path,
        mode_name,
    };

    return app::run(params);
}
