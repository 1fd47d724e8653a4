use rand::Rng;

use crate::classify::{Classification, KnownEyeShapes};
use crate::error::{Error, Result};
use crate::geometry::{Polygon, Scene, Transform};
use crate::paint::{Color, ColorSelector};

use super::shader::{self, ShaderProgram, POLYGON_FRAGMENT_WGSL, POLYGON_VERTEX_WGSL};
use super::DrawSurface;

enum State {
    Uninitialized,
    Ready(ShaderProgram),
}

/// Polygon renderer: owns the draw surface and the linked shader program.
///
/// Lifecycle: `Uninitialized` until [`initialize`](Self::initialize) succeeds,
/// then `Ready` for the rest of its life. Every drawing operation fails with
/// [`Error::NotInitialized`] before that.
pub struct Renderer<S> {
    surface: S,
    state: State,

    /// Flattened NDC positions of the polygon being drawn. Reused across draws.
    scratch: Vec<f32>,
}

impl<S: DrawSurface> Renderer<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            state: State::Uninitialized,
            scratch: Vec::new(),
        }
    }

    /// Compiles and links the two shader stages.
    ///
    /// On failure the renderer stays in its previous state.
    pub fn initialize(&mut self, vertex_source: &str, fragment_source: &str) -> Result<()> {
        let program = shader::build_program(vertex_source, fragment_source)?;
        log::debug!(
            "shader program linked (vertex `{}`, fragment `{}`)",
            program.vertex_entry(),
            program.fragment_entry()
        );
        self.state = State::Ready(program);
        Ok(())
    }

    /// [`initialize`](Self::initialize) with the built-in polygon shaders.
    pub fn initialize_default(&mut self) -> Result<()> {
        self.initialize(POLYGON_VERTEX_WGSL, POLYGON_FRAGMENT_WGSL)
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    pub fn program(&self) -> Result<&ShaderProgram> {
        match &self.state {
            State::Ready(program) => Ok(program),
            State::Uninitialized => Err(Error::NotInitialized),
        }
    }

    #[inline]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[inline]
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Resets the surface to `background`.
    pub fn clear(&mut self, background: Color) -> Result<()> {
        self.program()?;
        self.surface.clear(background);
        Ok(())
    }

    /// Transforms `polygon` into NDC and draws it as a filled fan.
    ///
    /// Point order is the fan order; non-convex orders fill incorrectly, as a
    /// plain GL fan would.
    pub fn draw_polygon(&mut self, polygon: &Polygon, transform: &Transform, color: Color) -> Result<()> {
        self.program()?;
        ensure_drawable(polygon)?;

        self.scratch.clear();
        for &p in polygon.points() {
            self.scratch.extend_from_slice(&transform.to_ndc(p));
        }

        self.surface.upload_vertices(&self.scratch);
        self.surface.set_color(color);
        self.surface.draw_triangle_fan(polygon.len() as u32);

        log::trace!("fan: {} vertices, color {:?}", polygon.len(), color);
        Ok(())
    }

    /// Clears to `background`, then draws every polygon in scene order.
    ///
    /// Every polygon is validated and colored before anything reaches the
    /// surface, so an error leaves the surface untouched. Returns the number of
    /// polygons drawn.
    pub fn render_scene<R: Rng>(
        &mut self,
        scene: &Scene,
        transform: &Transform,
        eyes: &KnownEyeShapes,
        selector: &mut ColorSelector<R>,
        background: Color,
    ) -> Result<usize> {
        self.program()?;

        let mut eye_count = 0usize;
        let colors = scene
            .polygons()
            .iter()
            .map(|polygon| {
                ensure_drawable(polygon)?;
                let class = eyes.classify(polygon);
                if class == Classification::Eye {
                    eye_count += 1;
                }
                selector.select(class)
            })
            .collect::<Result<Vec<_>>>()?;

        self.clear(background)?;
        for (polygon, color) in scene.polygons().iter().zip(colors) {
            self.draw_polygon(polygon, transform, color)?;
        }

        log::debug!("rendered {} polygons ({eye_count} eyes)", scene.len());
        Ok(scene.len())
    }
}

fn ensure_drawable(polygon: &Polygon) -> Result<()> {
    if polygon.len() < 3 {
        return Err(Error::TooFewVertices {
            count: polygon.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::geometry::{compute_transform, Point};
    use crate::paint::Palette;
    use crate::render::{DrawCmd, DrawList};

    const EYE_BLUE: Color = Color::new(0.6, 0.8, 1.0, 1.0);

    fn ready() -> Renderer<DrawList> {
        let mut r = Renderer::new(DrawList::new());
        r.initialize_default().unwrap();
        r
    }

    fn selector(seed: u64) -> ColorSelector<StdRng> {
        ColorSelector::new(Palette::face_mosaic(), StdRng::seed_from_u64(seed))
    }

    fn unit_transform() -> Transform {
        Transform {
            scale_x: 1.0,
            scale_y: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }

    #[test]
    fn drawing_before_initialize_fails() {
        let mut r = Renderer::new(DrawList::new());
        let tri = Polygon::from_coords(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);

        assert_eq!(r.clear(Color::white()), Err(Error::NotInitialized));
        assert_eq!(
            r.draw_polygon(&tri, &unit_transform(), EYE_BLUE),
            Err(Error::NotInitialized)
        );
        assert_eq!(
            r.render_scene(
                &Scene::new(vec![tri]),
                &unit_transform(),
                &KnownEyeShapes::face_mosaic(),
                &mut selector(0),
                Color::white(),
            ),
            Err(Error::NotInitialized)
        );
        assert!(r.surface().is_empty());
    }

    #[test]
    fn failed_initialize_stays_uninitialized() {
        let mut r = Renderer::new(DrawList::new());
        let err = r.initialize("not wgsl", POLYGON_FRAGMENT_WGSL).unwrap_err();

        assert!(matches!(err, Error::ShaderCompile { .. }));
        assert!(!r.is_ready());
        assert_eq!(r.program().unwrap_err(), Error::NotInitialized);
    }

    #[test]
    fn polygon_draws_as_fan_in_ndc() {
        let mut r = ready();
        let square = Polygon::from_coords(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0), (1.0, 3.0)]);
        let t = Transform {
            scale_x: 1.0,
            scale_y: 0.5,
            translate_x: -1.0,
            translate_y: -1.0,
        };

        r.draw_polygon(&square, &t, EYE_BLUE).unwrap();

        let list = r.surface();
        let fan = *list.fans().next().unwrap();
        assert_eq!(fan.vertex_count, 5);
        assert_eq!(fan.color, EYE_BLUE);

        let expected: [[f32; 2]; 5] = [[-1.0, 0.5], [1.0, 0.5], [1.0, -0.5], [-1.0, -0.5], [0.0, -1.0]];
        assert_eq!(list.fan_vertices(&fan), &expected);

        let tris: Vec<_> = list.fan_triangles(&fan).collect();
        assert_eq!(tris.len(), 3);
        for (i, tri) in tris.iter().enumerate() {
            assert_eq!(tri[0], expected[0]);
            assert_eq!(tri[1], expected[i + 1]);
            assert_eq!(tri[2], expected[i + 2]);
        }
    }

    #[test]
    fn fans_issue_n_minus_two_triangles() {
        let mut r = ready();
        for n in 3..9 {
            let poly: Polygon = (0..n).map(|i| Point::new(i as f32, (i * i) as f32)).collect();
            r.surface_mut().reset();
            r.draw_polygon(&poly, &unit_transform(), EYE_BLUE).unwrap();

            let list = r.surface();
            let fan = *list.fans().next().unwrap();
            assert_eq!(list.fan_triangles(&fan).count(), n - 2);
        }
    }

    #[test]
    fn short_polygon_is_rejected_without_drawing() {
        let mut r = ready();
        let line = Polygon::from_coords(&[(0.0, 0.0), (1.0, 1.0)]);

        assert_eq!(
            r.draw_polygon(&line, &unit_transform(), EYE_BLUE),
            Err(Error::TooFewVertices { count: 2 })
        );
        assert!(r.surface().is_empty());
    }

    #[test]
    fn scene_renders_eyes_blue_and_skin_from_palette() {
        let eyes = KnownEyeShapes::face_mosaic();
        let other = Polygon::from_coords(&[(100.0, 100.0), (700.0, 120.0), (400.0, 900.0)]);
        let scene = Scene::new(vec![
            eyes.shapes()[0].clone(),
            eyes.shapes()[1].clone(),
            other,
        ]);
        let transform = compute_transform(&scene).unwrap();
        let mut r = ready();

        let drawn = r
            .render_scene(&scene, &transform, &eyes, &mut selector(9), Color::white())
            .unwrap();
        assert_eq!(drawn, 3);

        let cmds = r.surface().commands();
        assert_eq!(cmds.len(), 4);
        assert_eq!(cmds[0], DrawCmd::Clear(Color::white()));

        let fans: Vec<_> = r.surface().fans().copied().collect();
        assert_eq!(fans.len(), 3);
        assert_eq!(fans[0].color, EYE_BLUE);
        assert_eq!(fans[1].color, EYE_BLUE);
        assert!(Palette::face_mosaic().skin().contains(&fans[2].color));

        // Input order is draw order.
        let counts: Vec<_> = fans.iter().map(|f| f.vertex_count).collect();
        assert_eq!(counts, vec![4, 4, 3]);
        let first = r.surface().fan_vertices(&fans[2])[0];
        assert_eq!(first, transform.to_ndc(Point::new(100.0, 100.0)));
    }

    #[test]
    fn seeded_scene_render_is_reproducible() {
        let scene: Scene = (0..20)
            .map(|i| {
                let o = i as f32 * 10.0;
                Polygon::from_coords(&[(o, 0.0), (o + 5.0, 0.0), (o, 7.0)])
            })
            .collect();
        let t = compute_transform(&scene).unwrap();
        let eyes = KnownEyeShapes::face_mosaic();

        let mut a = ready();
        let mut b = ready();
        a.render_scene(&scene, &t, &eyes, &mut selector(5), Color::white()).unwrap();
        b.render_scene(&scene, &t, &eyes, &mut selector(5), Color::white()).unwrap();

        assert_eq!(a.surface().commands(), b.surface().commands());
    }

    #[test]
    fn invalid_polygon_aborts_before_clear() {
        let scene = Scene::new(vec![
            Polygon::from_coords(&[(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)]),
            Polygon::from_coords(&[(1.0, 1.0), (2.0, 2.0)]),
        ]);
        let t = compute_transform(&scene).unwrap();
        let mut r = ready();

        let err = r
            .render_scene(&scene, &t, &KnownEyeShapes::face_mosaic(), &mut selector(1), Color::white())
            .unwrap_err();
        assert_eq!(err, Error::TooFewVertices { count: 2 });
        assert!(r.surface().is_empty());
    }

    #[test]
    fn empty_palette_aborts_before_clear() {
        let scene = Scene::new(vec![Polygon::from_coords(&[(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)])]);
        let t = compute_transform(&scene).unwrap();
        let mut sel = ColorSelector::new(Palette::new(EYE_BLUE, Vec::new()), StdRng::seed_from_u64(0));
        let mut r = ready();

        let err = r
            .render_scene(&scene, &t, &KnownEyeShapes::face_mosaic(), &mut sel, Color::white())
            .unwrap_err();
        assert_eq!(err, Error::EmptyPalette);
        assert!(r.surface().is_empty());
    }
}
