//! Interactive line-oriented menu over the project service.
//!
//! # Responsibility
//! - Prompt for selections and field values, render results as text.
//! - Remember the currently selected project between selections.
//!
//! # Invariants
//! - Input and service failures never end the loop; only I/O failures do.
//! - Blank input at the selection prompt exits.

use crate::input::{non_blank, parse_decimal, parse_id, parse_int, InputError};
use log::{info, warn};
use projects_core::{Project, ProjectRepository, ProjectService, ProjectServiceError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};

const OPERATIONS: [&str; 5] = [
    "1) Add a project",
    "2) List projects",
    "3) Select a project",
    "4) Update project details",
    "5) Delete a project",
];

#[derive(Debug)]
enum MenuError {
    Input(InputError),
    Service(ProjectServiceError),
    Io(io::Error),
}

impl Display for MenuError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input(err) => write!(f, "{err}"),
            Self::Service(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MenuError {}

impl From<InputError> for MenuError {
    fn from(value: InputError) -> Self {
        Self::Input(value)
    }
}

impl From<ProjectServiceError> for MenuError {
    fn from(value: ProjectServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<io::Error> for MenuError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

type MenuResult<T> = Result<T, MenuError>;

pub struct ProjectsMenu<R: ProjectRepository, I: BufRead, O: Write> {
    service: ProjectService<R>,
    input: I,
    output: O,
    current: Option<Project>,
}

impl<R: ProjectRepository, I: BufRead, O: Write> ProjectsMenu<R, I, O> {
    pub fn new(service: ProjectService<R>, input: I, output: O) -> Self {
        Self {
            service,
            input,
            output,
            current: None,
        }
    }

    /// Runs selections until blank input or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            match self.process_selection() {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(MenuError::Io(err)) => return Err(err),
                Err(err) => {
                    warn!(
                        "event=menu_selection module=cli status=error error_kind={}",
                        error_kind(&err)
                    );
                    writeln!(self.output, "\nError: {err} Try again.")?;
                }
            }
        }
    }

    /// Returns `Ok(true)` when the user asked to quit.
    fn process_selection(&mut self) -> MenuResult<bool> {
        match self.read_selection()? {
            None => {
                writeln!(self.output, "Exiting the menu.")?;
                Ok(true)
            }
            Some(1) => self.create_project().map(|()| false),
            Some(2) => self.list_projects().map(|()| false),
            Some(3) => self.select_project().map(|()| false),
            Some(4) => self.update_project_details().map(|()| false),
            Some(5) => self.delete_project().map(|()| false),
            Some(other) => {
                writeln!(self.output, "\n{other} is not a valid selection. Try again.")?;
                Ok(false)
            }
        }
    }

    fn read_selection(&mut self) -> MenuResult<Option<i32>> {
        writeln!(
            self.output,
            "\nThese are the available selections. Press the Enter key to quit:"
        )?;
        for line in OPERATIONS {
            writeln!(self.output, "  {line}")?;
        }
        match &self.current {
            None => writeln!(self.output, "\nYou are not working with a project.")?,
            Some(project) => writeln!(
                self.output,
                "\nYou are working with project:\n{}",
                render_project(project)
            )?,
        }

        let line = self.prompt("Enter a menu selection")?;
        Ok(parse_int(line)?)
    }

    fn create_project(&mut self) -> MenuResult<()> {
        let name = self
            .prompt("Enter the project name")?
            .ok_or(InputError::Required("Project name"))?;
        let estimated_hours = parse_decimal(self.prompt("Enter the estimated hours")?)?;
        let actual_hours = parse_decimal(self.prompt("Enter the actual hours")?)?;
        let difficulty = parse_int(self.prompt("Enter the project difficulty (1-5)")?)?;
        let notes = self.prompt("Enter the project notes")?;

        let project = Project {
            estimated_hours,
            actual_hours,
            difficulty,
            notes,
            ..Project::new(name)
        };
        let created = self.service.add_project(project)?;
        info!(
            "event=menu_create module=cli status=ok project_id={}",
            created.project_id.unwrap_or_default()
        );
        writeln!(
            self.output,
            "You have successfully created project:\n{}",
            render_project(&created)
        )?;
        Ok(())
    }

    fn list_projects(&mut self) -> MenuResult<()> {
        let projects = self.service.fetch_all_projects()?;
        writeln!(self.output, "\nProjects:")?;
        for project in &projects {
            writeln!(self.output, "   {project}")?;
        }
        Ok(())
    }

    fn select_project(&mut self) -> MenuResult<()> {
        self.list_projects()?;
        let project_id = parse_id(self.prompt("Enter a project ID to select a project")?)?
            .ok_or(InputError::Required("Project ID"))?;

        self.current = None;
        self.current = Some(self.service.fetch_project_by_id(project_id)?);
        Ok(())
    }

    fn update_project_details(&mut self) -> MenuResult<()> {
        let Some(current) = self.current.clone() else {
            writeln!(self.output, "\nPlease select a project.")?;
            return Ok(());
        };

        let name = self.prompt(&format!("Enter the project name [{}]", current.project_name))?;
        let estimated_hours = parse_decimal(self.prompt(&format!(
            "Enter the estimated hours [{}]",
            show(&current.estimated_hours)
        ))?)?;
        let actual_hours = parse_decimal(self.prompt(&format!(
            "Enter the actual hours [{}]",
            show(&current.actual_hours)
        ))?)?;
        let difficulty = parse_int(self.prompt(&format!(
            "Enter the project difficulty (1-5) [{}]",
            show(&current.difficulty)
        ))?)?;
        let notes = self.prompt(&format!("Enter the project notes [{}]", show(&current.notes)))?;

        let project = Project {
            project_id: current.project_id,
            project_name: name.unwrap_or_else(|| current.project_name.clone()),
            estimated_hours: estimated_hours.or(current.estimated_hours),
            actual_hours: actual_hours.or(current.actual_hours),
            difficulty: difficulty.or(current.difficulty),
            notes: notes.or_else(|| current.notes.clone()),
            ..Project::default()
        };
        self.service.modify_project_details(&project)?;

        if let Some(project_id) = current.project_id {
            self.current = Some(self.service.fetch_project_by_id(project_id)?);
        }
        Ok(())
    }

    fn delete_project(&mut self) -> MenuResult<()> {
        self.list_projects()?;
        let Some(project_id) = parse_id(self.prompt("Enter the ID of the project to delete")?)?
        else {
            return Ok(());
        };

        self.service.delete_project(project_id)?;
        writeln!(self.output, "Project {project_id} was successfully deleted.")?;

        if self
            .current
            .as_ref()
            .is_some_and(|current| current.project_id == Some(project_id))
        {
            self.current = None;
        }
        Ok(())
    }

    /// Prints `text` and reads one line; blank or end of input is `None`.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{text}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(non_blank(&line))
    }
}

fn render_project(project: &Project) -> String {
    let mut lines = vec![
        format!("   ID={}", show(&project.project_id)),
        format!("   name={}", project.project_name),
        format!("   estimatedHours={}", show(&project.estimated_hours)),
        format!("   actualHours={}", show(&project.actual_hours)),
        format!("   difficulty={}", show(&project.difficulty)),
        format!("   notes={}", show(&project.notes)),
    ];

    lines.push("   Materials:".to_string());
    for material in &project.materials {
        lines.push(format!(
            "      {} x{} @ {}",
            material.material_name,
            show(&material.num_required),
            show(&material.cost)
        ));
    }
    lines.push("   Steps:".to_string());
    let mut steps: Vec<_> = project.steps.iter().collect();
    steps.sort_by_key(|step| step.step_order);
    for step in steps {
        lines.push(format!("      {}. {}", step.step_order, step.step_text));
    }
    lines.push("   Categories:".to_string());
    for category in &project.categories {
        lines.push(format!("      {}", category.category_name));
    }

    lines.join("\n")
}

fn show<T: Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map_or_else(String::new, |inner| inner.to_string())
}

fn error_kind(err: &MenuError) -> &'static str {
    match err {
        MenuError::Input(_) => "input",
        MenuError::Service(ProjectServiceError::ProjectNotFound(_)) => "not_found",
        MenuError::Service(ProjectServiceError::Repo(_)) => "store",
        MenuError::Io(_) => "io",
    }
}
