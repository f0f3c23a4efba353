use std::f32::consts::FRAC_PI_2;

use eframe::egui::epaint::TextShape;
use eframe::egui::{self, Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Stroke, Ui, Vec2};

use crate::chart::layout::{BoxPlotChart, ScatterChart};
use crate::chart::scale::LinearScale;
use crate::color::BOX_FILL;
use crate::config::{ChartConfig, Frame};
use crate::state::AppState;

const AXIS_STROKE: Stroke = Stroke {
    width: 1.0,
    color: Color32::BLACK,
};
const TICK_LEN: f32 = 6.0;

// ---------------------------------------------------------------------------
// Chart area (central panel)
// ---------------------------------------------------------------------------

/// Render both charts in the central panel.
pub fn charts(ui: &mut Ui, state: &AppState) {
    let Some(charts) = &state.charts else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view the charts  (File → Open…)");
        });
        return;
    };

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            scatter_plot(ui, &charts.scatter, &state.config);
            ui.add_space(16.0);
            box_plot(ui, &charts.boxplot, &state.config);
        });
}

/// Maps inner-area coordinates to screen positions.
struct Canvas {
    painter: Painter,
    origin: Pos2,
    frame: Frame,
}

impl Canvas {
    fn allocate(ui: &mut Ui, frame: Frame) -> Self {
        let size = Vec2::new(frame.width as f32, frame.height as f32);
        let (response, painter) = ui.allocate_painter(size, Sense::hover());
        painter.rect_filled(response.rect, 0.0, Color32::WHITE);
        let origin = response.rect.min + Vec2::new(frame.margin.left as f32, frame.margin.top as f32);
        Canvas {
            painter,
            origin,
            frame,
        }
    }

    fn pos(&self, x: f64, y: f64) -> Pos2 {
        self.origin + Vec2::new(x as f32, y as f32)
    }

    fn text(&self, at: Pos2, anchor: Align2, text: impl ToString) {
        self.painter
            .text(at, anchor, text.to_string(), FontId::proportional(11.0), Color32::BLACK);
    }

    /// Horizontal axis along the bottom of the inner area.
    fn bottom_axis(&self, scale: &LinearScale, tick_count: usize) {
        let h = self.frame.inner_height();
        let (r0, r1) = scale.range();
        self.painter.line_segment([self.pos(r0, h), self.pos(r1, h)], AXIS_STROKE);
        for t in scale.ticks(tick_count) {
            let p = self.pos(scale.map(t), h);
            self.painter
                .line_segment([p, p + Vec2::new(0.0, TICK_LEN)], AXIS_STROKE);
            self.text(p + Vec2::new(0.0, TICK_LEN + 2.0), Align2::CENTER_TOP, t);
        }
    }

    /// Vertical axis along the left edge of the inner area.
    fn left_axis(&self, scale: &LinearScale, tick_count: usize) {
        let (r0, r1) = scale.range();
        self.painter.line_segment([self.pos(0.0, r0), self.pos(0.0, r1)], AXIS_STROKE);
        for t in scale.ticks(tick_count) {
            let p = self.pos(0.0, scale.map(t));
            self.painter
                .line_segment([p, p - Vec2::new(TICK_LEN, 0.0)], AXIS_STROKE);
            self.text(p - Vec2::new(TICK_LEN + 2.0, 0.0), Align2::RIGHT_CENTER, t);
        }
    }

    fn axis_titles(&self, x_title: &str, y_title: &str) {
        let w = self.frame.inner_width();
        let h = self.frame.inner_height();
        self.text(
            self.pos(w / 2.0, h + self.frame.margin.bottom - 10.0),
            Align2::CENTER_BOTTOM,
            x_title,
        );
        // Reads bottom to top, centred along the left margin.
        let galley = self
            .painter
            .layout_no_wrap(y_title.to_owned(), FontId::proportional(11.0), Color32::BLACK);
        let anchor = self.pos(-self.frame.margin.left + 6.0, h / 2.0) + Vec2::new(0.0, galley.size().x / 2.0);
        self.painter
            .add(TextShape::new(anchor, galley, Color32::BLACK).with_angle(-FRAC_PI_2));
    }
}

// ---------------------------------------------------------------------------
// Scatter plot
// ---------------------------------------------------------------------------

fn scatter_plot(ui: &mut Ui, chart: &ScatterChart, config: &ChartConfig) {
    let canvas = Canvas::allocate(ui, chart.frame);

    canvas.bottom_axis(&chart.x, config.tick_count);
    canvas.left_axis(&chart.y, config.tick_count);
    canvas.axis_titles("Petal Length", "Petal Width");

    let radius = config.point_radius as f32;
    for p in &chart.points {
        canvas.painter.circle_filled(canvas.pos(p.x, p.y), radius, p.color);
    }

    for entry in &chart.legend {
        let at = canvas.pos(entry.x, entry.y);
        canvas.painter.circle_filled(at, radius, entry.color);
        canvas.text(at + Vec2::new(15.0, 0.0), Align2::LEFT_CENTER, &entry.label);
    }
}

// ---------------------------------------------------------------------------
// Box plot
// ---------------------------------------------------------------------------

fn box_plot(ui: &mut Ui, chart: &BoxPlotChart, config: &ChartConfig) {
    let canvas = Canvas::allocate(ui, chart.frame);
    let h = canvas.frame.inner_height();

    // Categorical axis: one label per band.
    canvas
        .painter
        .line_segment([canvas.pos(0.0, h), canvas.pos(canvas.frame.inner_width(), h)], AXIS_STROKE);
    for label in chart.x.domain() {
        if let Some(cx) = chart.x.band_center(label) {
            let p = canvas.pos(cx, h);
            canvas
                .painter
                .line_segment([p, p + Vec2::new(0.0, TICK_LEN)], AXIS_STROKE);
            canvas.text(p + Vec2::new(0.0, TICK_LEN + 2.0), Align2::CENTER_TOP, label);
        }
    }
    canvas.left_axis(&chart.y, config.tick_count);
    canvas.axis_titles("Species", &chart.field.to_string());

    for g in chart.boxes.values() {
        canvas.painter.line_segment(
            [canvas.pos(g.center_x, g.whisker_bottom), canvas.pos(g.center_x, g.whisker_top)],
            AXIS_STROKE,
        );
        let rect = Rect::from_min_max(canvas.pos(g.x, g.box_top), canvas.pos(g.x + g.width, g.box_bottom));
        canvas.painter.rect_filled(rect, 0.0, BOX_FILL);
        canvas.painter.line_segment(
            [canvas.pos(g.x, g.median_y), canvas.pos(g.x + g.width, g.median_y)],
            AXIS_STROKE,
        );
    }
}
