//! Step-indexed slideshow dialogs.
//!
//! A [`Slideshow`] tracks the current step of a dialog and the title shown
//! for it. The story's two slideshows wrap it with their own titles and
//! completion flags.

use crate::story::{HubblesLaw, Measurements};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// Navigation request from the dialog's controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideshowNav {
    Back,
    Next,
    Close,
}

/// Step and title state of a slideshow dialog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slideshow {
    step: usize,
    length: usize,
    dialog: bool,
    current_title: String,
    #[serde(skip)]
    titles: Vec<String>,
    #[serde(skip)]
    default_title: String,
}

impl Slideshow {
    /// Create a slideshow with one step per title.
    pub fn new<I, S>(titles: I, default_title: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let titles: Vec<String> = titles.into_iter().map(Into::into).collect();
        let default_title = default_title.into();
        Self {
            step: 0,
            length: titles.len(),
            dialog: false,
            current_title: default_title.clone(),
            titles,
            default_title,
        }
    }

    /// Override the number of steps.
    ///
    /// Steps without a title show the default title.
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn current_title(&self) -> &str {
        &self.current_title
    }

    /// Check if the dialog is showing.
    pub fn is_open(&self) -> bool {
        self.dialog
    }

    pub fn open(&mut self) {
        self.dialog = true;
    }

    pub fn close(&mut self) {
        self.dialog = false;
    }

    /// Jump to a step and update the title.
    pub fn set_step(&mut self, step: usize) {
        self.step = step;
        self.current_title = self
            .titles
            .get(step)
            .cloned()
            .unwrap_or_else(|| self.default_title.clone());
    }

    /// Check if the current step is the last one.
    pub fn is_last_step(&self) -> bool {
        self.step + 1 >= self.length
    }

    /// Advance one step. Returns false at the last step.
    pub fn next(&mut self) -> bool {
        if self.is_last_step() {
            return false;
        }
        self.set_step(self.step + 1);
        true
    }

    /// Go back one step. Returns false at the first step.
    pub fn previous(&mut self) -> bool {
        if self.step == 0 {
            return false;
        }
        self.set_step(self.step - 1);
        true
    }

    /// Apply a navigation request. Returns true if the state changed.
    pub fn navigate(&mut self, nav: SlideshowNav) -> bool {
        match nav {
            SlideshowNav::Back => self.previous(),
            SlideshowNav::Next => self.next(),
            SlideshowNav::Close => {
                let was_open = self.dialog;
                self.close();
                was_open
            }
        }
    }
}

const INTRO_TITLES: [&str; 7] = [
    "Hubble Data Story",
    "1920's Astronomy",
    "Explore the Night Sky",
    "What Are Nebulae?",
    "Spiral Nebulae",
    "Henrietta Leavitt's Discovery",
    "Vesto Slipher and Spectra",
];

/// Opening slideshow of the story.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntroSlideshow {
    #[serde(flatten)]
    slideshow: Slideshow,
    exploration_complete: bool,
    intro_complete: bool,
}

impl Default for IntroSlideshow {
    fn default() -> Self {
        Self::new()
    }
}

impl IntroSlideshow {
    pub fn new() -> Self {
        Self {
            slideshow: Slideshow::new(INTRO_TITLES, "Hubble Data Story"),
            exploration_complete: false,
            intro_complete: false,
        }
    }

    pub fn slideshow(&self) -> &Slideshow {
        &self.slideshow
    }

    pub fn slideshow_mut(&mut self) -> &mut Slideshow {
        &mut self.slideshow
    }

    /// Mirror the embedded exploration tool's completion flag.
    pub fn set_exploration_complete(&mut self, complete: bool) {
        self.exploration_complete = complete;
    }

    pub fn exploration_complete(&self) -> bool {
        self.exploration_complete
    }

    /// Mark the intro finished and close the dialog.
    pub fn complete(&mut self) {
        self.intro_complete = true;
        self.slideshow.close();
    }

    pub fn intro_complete(&self) -> bool {
        self.intro_complete
    }
}

const ANGSIZE_TITLES: [&str; 13] = [
    "1920's Astronomy",
    "1920's Astronomy",
    "How can we know how far away something is?",
    "How can we know how far away something is?",
    "How can we know how far away something is?",
    "How can we know how far away something is?",
    "Galaxy Distances",
    "Galaxy Distances",
    "Galaxy Distances",
    "Galaxy Distances",
    "Galaxy Distances",
    "Galaxy Distances",
    "Galaxy Distances",
];

/// Slideshow introducing angular size as a distance measure.
///
/// Some steps ask the student to interact with the embedded tool; the dialog
/// cannot move past them until they are completed. The slideshow can share
/// the story state so its steps read the student's measurements.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AngsizeDistanceSlideshow {
    #[serde(flatten)]
    slideshow: Slideshow,
    max_step_completed: usize,
    interact_steps: Vec<usize>,
    #[serde(skip)]
    story: Option<Rc<RefCell<HubblesLaw>>>,
}

impl Default for AngsizeDistanceSlideshow {
    fn default() -> Self {
        Self::new()
    }
}

impl AngsizeDistanceSlideshow {
    pub fn new() -> Self {
        Self {
            slideshow: Slideshow::new(ANGSIZE_TITLES, "1920's Astronomy"),
            max_step_completed: 0,
            interact_steps: vec![7, 9],
            story: None,
        }
    }

    /// Share the story state with this slideshow.
    pub fn with_story(mut self, story: Rc<RefCell<HubblesLaw>>) -> Self {
        self.story = Some(story);
        self
    }

    pub fn story(&self) -> Option<&Rc<RefCell<HubblesLaw>>> {
        self.story.as_ref()
    }

    /// The story's current measurements, if a story is attached.
    pub fn measurements(&self) -> Option<Measurements> {
        self.story
            .as_ref()
            .map(|story| story.borrow().measurements.clone())
    }

    pub fn slideshow(&self) -> &Slideshow {
        &self.slideshow
    }

    pub fn slideshow_mut(&mut self) -> &mut Slideshow {
        &mut self.slideshow
    }

    pub fn max_step_completed(&self) -> usize {
        self.max_step_completed
    }

    pub fn interact_steps(&self) -> &[usize] {
        &self.interact_steps
    }

    /// Record that the interaction on `step` is done.
    pub fn complete_step(&mut self, step: usize) {
        self.max_step_completed = self.max_step_completed.max(step);
    }

    /// Check if the dialog may move past the current step.
    pub fn can_advance(&self) -> bool {
        let step = self.slideshow.step();
        !self.interact_steps.contains(&step) || self.max_step_completed >= step
    }

    /// Apply a navigation request, holding at unfinished interact steps.
    pub fn navigate(&mut self, nav: SlideshowNav) -> bool {
        if nav == SlideshowNav::Next {
            if !self.can_advance() {
                log::debug!("Slideshow held at interact step {}", self.slideshow.step());
                return false;
            }
            self.complete_step(self.slideshow.step());
        }
        self.slideshow.navigate(nav)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_follows_step() {
        let mut slideshow = Slideshow::new(["One", "Two"], "Default");
        assert_eq!(slideshow.current_title(), "Default");

        slideshow.set_step(1);
        assert_eq!(slideshow.current_title(), "Two");

        slideshow.set_step(5);
        assert_eq!(slideshow.current_title(), "Default");
    }

    #[test]
    fn test_navigation_clamps() {
        let mut slideshow = Slideshow::new(["One", "Two"], "Default");
        assert!(!slideshow.previous());
        assert!(slideshow.next());
        assert!(slideshow.is_last_step());
        assert!(!slideshow.next());
        assert_eq!(slideshow.step(), 1);
    }

    #[test]
    fn test_with_length_uses_default_title() {
        let mut slideshow = Slideshow::new(["One"], "Default").with_length(3);
        slideshow.set_step(2);
        assert_eq!(slideshow.current_title(), "Default");
        assert!(slideshow.is_last_step());
    }

    #[test]
    fn test_close_nav() {
        let mut slideshow = Slideshow::new(["One"], "Default");
        slideshow.open();
        assert!(slideshow.navigate(SlideshowNav::Close));
        assert!(!slideshow.is_open());
        assert!(!slideshow.navigate(SlideshowNav::Close));
    }

    #[test]
    fn test_intro() {
        let mut intro = IntroSlideshow::new();
        assert_eq!(intro.slideshow().length(), 7);
        assert_eq!(intro.slideshow().current_title(), "Hubble Data Story");

        intro.slideshow_mut().set_step(6);
        assert_eq!(intro.slideshow().current_title(), "Vesto Slipher and Spectra");

        intro.set_exploration_complete(true);
        intro.slideshow_mut().open();
        intro.complete();
        assert!(intro.exploration_complete());
        assert!(intro.intro_complete());
        assert!(!intro.slideshow().is_open());
    }

    #[test]
    fn test_angsize_holds_at_interact_step() {
        let mut show = AngsizeDistanceSlideshow::new();
        show.slideshow_mut().set_step(7);

        assert!(!show.can_advance());
        assert!(!show.navigate(SlideshowNav::Next));
        assert_eq!(show.slideshow().step(), 7);

        show.complete_step(7);
        assert!(show.navigate(SlideshowNav::Next));
        assert_eq!(show.slideshow().step(), 8);
        assert_eq!(show.slideshow().current_title(), "Galaxy Distances");
    }

    #[test]
    fn test_angsize_tracks_progress() {
        let mut show = AngsizeDistanceSlideshow::new();
        for _ in 0..3 {
            assert!(show.navigate(SlideshowNav::Next));
        }
        assert_eq!(show.max_step_completed(), 2);

        show.navigate(SlideshowNav::Back);
        assert_eq!(show.max_step_completed(), 2);
    }

    #[test]
    fn test_angsize_reads_story_measurements() {
        let story = Rc::new(RefCell::new(HubblesLaw::new().unwrap()));
        let show = AngsizeDistanceSlideshow::new().with_story(Rc::clone(&story));
        assert_eq!(show.measurements().unwrap().ang_size, 50.0);

        story.borrow_mut().measurements.ang_size = 12.5;
        assert_eq!(show.measurements().unwrap().ang_size, 12.5);

        assert!(AngsizeDistanceSlideshow::new().measurements().is_none());
        let json = serde_json::to_value(&show).unwrap();
        assert!(json.get("story").is_none());
    }

    #[test]
    fn test_serialized_state() {
        let intro = IntroSlideshow::new();
        let json = serde_json::to_value(&intro).unwrap();
        assert_eq!(json["currentTitle"], "Hubble Data Story");
        assert_eq!(json["length"], 7);
        assert_eq!(json["dialog"], false);
        assert_eq!(json["introComplete"], false);
    }
}
