use macroquad::prelude::*;
use rpgm_tilemap::{
    MapDocument, MapRenderer, RendererSettings, TileFlags, TileTexture, TilesetTextures, Update,
    SLOT_A1, SLOT_A2,
};

fn window_conf() -> Conf {
    Conf {
        window_title: "Flat Plain".into(),
        window_width: 1024,
        window_height: 640,
        ..Default::default()
    }
}

fn solid_sheet(key: &str, color: Color) -> TileTexture {
    let tex = Texture2D::from_image(&Image::gen_image_color(768, 576, color));
    tex.set_filter(FilterMode::Nearest);
    TileTexture::from_texture(key, tex)
}

#[macroquad::main(window_conf)]
async fn main() {
    // A grass field with an animated water border and a few shadows.
    let (w, h) = (32, 24);
    let mut map = MapDocument::flat(1, w, h, 2816).expect("map dimensions are valid");
    for x in 0..w as i32 {
        map.set_plane_value(x, 0, 0, 2048);
        map.set_plane_value(x, h as i32 - 1, 0, 2048);
    }
    for y in 0..h as i32 {
        map.set_plane_value(0, y, 0, 2048);
        map.set_plane_value(w as i32 - 1, y, 0, 2048);
        map.set_plane_value(y % (w as i32), y, 4, 0b0101);
    }

    let mut textures = TilesetTextures::new();
    textures.set(SLOT_A1, solid_sheet("A1", SKYBLUE));
    textures.set(SLOT_A2, solid_sheet("A2", DARKGREEN));

    let mut renderer = MapRenderer::new(
        map,
        TileFlags::new(vec![]),
        textures,
        RendererSettings::default(),
    )
    .expect("tileset seeding cannot conflict");

    let mut origin = vec2(0.0, 0.0);
    loop {
        let dt = get_frame_time();
        let speed = 240.0 * dt;
        if is_key_down(KeyCode::Right) {
            origin.x += speed;
        }
        if is_key_down(KeyCode::Left) {
            origin.x -= speed;
        }
        if is_key_down(KeyCode::Down) {
            origin.y += speed;
        }
        if is_key_down(KeyCode::Up) {
            origin.y -= speed;
        }

        clear_background(BLACK);
        renderer.set_viewport(screen_width(), screen_height());
        renderer.set_origin(origin.x, origin.y);
        renderer.update(dt);
        renderer.draw();

        draw_text(&format!("FPS: {}", get_fps()), 16.0, 24.0, 24.0, WHITE);
        next_frame().await;
    }
}
