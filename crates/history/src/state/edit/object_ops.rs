//! Whole-object commands: add, delete, move, edit, scale, load

use shared::{Compound, LineKind, ObjectId, ObjectKind, Point, Shape};

use super::file::{FigureFile, ObjectSpec};
use crate::error::HistoryError;
use crate::state::figure::{Document, LinkInfo, LinkMode};
use crate::state::history::{ActionKind, Target};
use crate::state::EditorSession;

impl EditorSession {
    fn require_top_level(&self, id: ObjectId) -> Result<ObjectKind, HistoryError> {
        let kind = self.figure.kind_of(id)?;
        if !self.figure.contains(kind, id) {
            return Err(HistoryError::NotInFigure(id));
        }
        Ok(kind)
    }

    /// Add one object to the figure
    pub fn add_object(&mut self, shape: Shape) -> Result<ObjectId, HistoryError> {
        let (kind, id) = self.figure.alloc_spec(ObjectSpec::Shape(shape))?;
        self.figure.insert(kind, id)?;

        self.set_action_object(ActionKind::Add, Target::Object(kind));
        self.set_latest_object(kind, id);
        self.undo_update_history()?;

        if let Some(region) = self.figure.bounds(id) {
            self.redisplay.region(region);
        }
        Ok(id)
    }

    /// Append a block of objects at once, as a paste or merge does
    pub fn add_objects(&mut self, specs: Vec<ObjectSpec>) -> Result<Compound, HistoryError> {
        let block = self.figure.alloc_block(specs)?;
        let tails = self.figure.append_objects(&block)?;

        self.set_action_object(ActionKind::Add, Target::AllObjects);
        self.set_latest_objects(block.clone());
        self.set_list_tails(tails);
        self.undo_update_history()?;

        self.redisplay.canvas();
        Ok(block)
    }

    pub fn delete_object(&mut self, id: ObjectId) -> Result<(), HistoryError> {
        let kind = self.require_top_level(id)?;
        let region = self.figure.bounds(id);
        let index = self.figure.remove(kind, id)?;
        self.figure.set_marked(id, false);

        self.set_action_object(ActionKind::Delete, Target::Object(kind));
        self.set_latest_object(kind, id);
        self.set_list_slots(vec![index]);
        self.undo_update_history()?;

        if let Some(region) = region {
            self.redisplay.region(region);
        }
        Ok(())
    }

    /// Remove every object but keep the figure comments and colors
    pub fn delete_all(&mut self) -> Result<(), HistoryError> {
        let block = self.figure.take_objects();
        self.figure.clear_markers();

        self.set_action_object(ActionKind::Delete, Target::AllObjects);
        self.set_latest_objects(block);
        self.undo_update_history()?;

        self.redisplay.canvas();
        Ok(())
    }

    /// Empty the figure completely: objects, comments and user colors
    pub fn clear_figure(&mut self) -> Result<(), HistoryError> {
        let mut block = self.figure.take_objects();
        self.figure.swap_comments(&mut block.comments);
        let mut colors = Vec::new();
        self.figure.swap_colors(&mut colors);
        self.figure.clear_markers();

        self.set_action_object(ActionKind::Delete, Target::Figure);
        self.set_latest_objects(block);
        self.set_saved_colors(colors);
        self.undo_update_history()?;

        self.redisplay.canvas();
        Ok(())
    }

    /// Open polylines with an endpoint inside the extent of `id`
    fn find_links(&self, id: ObjectId) -> Vec<LinkInfo> {
        let Some(area) = self.figure.bounds(id) else {
            return Vec::new();
        };
        let inside = |p: Point| {
            p.x >= area.min.x && p.x <= area.max.x && p.y >= area.min.y && p.y <= area.max.y
        };
        let mut links = Vec::new();
        for &line_id in &self.figure.objects().lines {
            if line_id == id {
                continue;
            }
            let Ok(line) = self.figure.line(line_id) else {
                continue;
            };
            let len = line.points.len();
            if line.kind != LineKind::Polyline || len < 2 {
                continue;
            }
            for (endpoint, prev) in [(0, 1), (len - 1, len - 2)] {
                let at = line.points[endpoint];
                if inside(at) {
                    links.push(LinkInfo {
                        line: line_id,
                        endpoint,
                        prev_point: Some(prev),
                        slide_x: len > 2 && at.x == line.points[prev].x,
                    });
                }
            }
        }
        links
    }

    /// Translate an object; attached polylines follow per the link mode setting
    pub fn move_object(&mut self, id: ObjectId, dx: i32, dy: i32) -> Result<(), HistoryError> {
        let kind = self.require_top_level(id)?;
        let before = self.figure.bounds(id);
        let last = before.map(|b| b.min).unwrap_or_default();
        let mode = self.settings.link_mode;
        let links = if mode == LinkMode::Off {
            Vec::new()
        } else {
            self.find_links(id)
        };

        self.figure.translate(id, dx, dy)?;
        self.figure.adjust_links(mode, &links, dx, dy)?;

        self.set_action_object(ActionKind::Move, Target::Object(kind));
        self.set_latest_object(kind, id);
        self.set_last_position(last);
        self.set_new_position(last.offset(dx, dy));
        self.set_last_link_info(mode, links);
        self.undo_update_history()?;

        self.redisplay.regions(before, self.figure.bounds(id));
        Ok(())
    }

    /// Edit an object in place. `edit` must not change the kind of object.
    pub fn change_object(
        &mut self,
        id: ObjectId,
        edit: impl FnOnce(&mut Shape),
    ) -> Result<(), HistoryError> {
        let kind = self.require_top_level(id)?;
        let current = self.figure.shape(id)?.clone();
        let mut edited = current.clone();
        edit(&mut edited);
        if edited.kind() != kind {
            return Err(HistoryError::InvalidEdit(format!(
                "an edit cannot turn a {kind} into a {}",
                edited.kind()
            )));
        }
        if let (Shape::Compound(a), Shape::Compound(b)) = (&current, &edited) {
            if a.handles().ne(b.handles()) {
                return Err(HistoryError::InvalidEdit(
                    "compound members are changed through glue and break".into(),
                ));
            }
        }

        let before = self.figure.bounds(id);
        let original = self.figure.alloc(current);
        self.figure.remove_object_depth(id);
        *self.figure.shape_mut(id)? = edited;
        self.figure.add_object_depth(id);

        self.set_action_object(ActionKind::Edit, Target::Object(kind));
        self.set_latest_object(kind, original);
        self.set_changed_object(id);
        self.undo_update_history()?;

        self.redisplay.regions(before, self.figure.bounds(id));
        Ok(())
    }

    /// Replace the comments of an object, or of the figure when `id` is `None`
    pub fn edit_comments(
        &mut self,
        id: Option<ObjectId>,
        comments: Option<String>,
    ) -> Result<(), HistoryError> {
        match id {
            Some(id) => self.change_object(id, |shape| *shape.comments_mut() = comments),
            None => {
                let mut previous = comments;
                self.figure.swap_comments(&mut previous);
                self.set_action_object(ActionKind::Edit, Target::Figure);
                self.set_saved_comments(previous);
                self.undo_update_history()?;
                Ok(())
            }
        }
    }

    /// Apply `edit` to every top-level object as one undoable step
    pub fn edit_all(&mut self, mut edit: impl FnMut(&mut Shape)) -> Result<(), HistoryError> {
        let mut edited = Vec::new();
        for (kind, id) in self.figure.objects().handles() {
            let mut shape = self.figure.shape(id)?.clone();
            edit(&mut shape);
            if shape.kind() != kind {
                return Err(HistoryError::InvalidEdit(format!(
                    "an edit cannot turn a {kind} into a {}",
                    shape.kind()
                )));
            }
            edited.push(shape);
        }

        let mut previous = self.figure.take_objects();
        let mut block = Compound::default();
        for shape in edited {
            let kind = shape.kind();
            let id = self.figure.alloc(shape);
            block.list_mut(kind).push(id);
        }
        self.figure.append_objects(&block)?;
        previous.comments = self.figure.comments().map(str::to_owned);

        self.set_action_object(ActionKind::Edit, Target::AllObjects);
        self.set_latest_objects(previous);
        self.undo_update_history()?;

        self.redisplay.canvas();
        Ok(())
    }

    /// Scale an object about `origin`. The scaled copy replaces the object at
    /// the same list position; its handle is returned.
    pub fn scale_object(
        &mut self,
        id: ObjectId,
        origin: Point,
        sx: f64,
        sy: f64,
    ) -> Result<ObjectId, HistoryError> {
        let kind = self.require_top_level(id)?;
        if sx == 0.0 || sy == 0.0 {
            return Err(HistoryError::InvalidEdit("scale factor of zero".into()));
        }
        let before = self.figure.bounds(id);
        let scaled = self.figure.duplicate(id)?;
        self.figure.scale(scaled, origin, sx, sy)?;
        let index = self.figure.remove(kind, id)?;
        self.figure.insert_at(kind, index, scaled)?;
        self.figure.set_marked(id, false);

        self.set_action_object(ActionKind::Scale, Target::Object(kind));
        self.set_latest_object(kind, id);
        self.set_changed_object(scaled);
        self.undo_update_history()?;

        self.redisplay.regions(before, self.figure.bounds(scaled));
        Ok(scaled)
    }

    /// Replace the whole document
    pub fn load_document(&mut self, file: FigureFile) -> Result<(), HistoryError> {
        let mut objects = self.figure.alloc_block(file.objects)?;
        objects.comments = file.comments;
        let mut document = Document {
            objects,
            colors: file.colors,
            filename: file.filename,
            ..Document::default()
        };
        self.figure.swap_document(&mut document);
        self.figure.recount_depths();
        tracing::info!(filename = self.figure.filename(), "document loaded");

        self.set_action_object(ActionKind::Load, Target::Figure);
        self.set_previous_document(document);
        self.undo_update_history()?;

        self.redisplay.canvas();
        Ok(())
    }
}
