//! Fixed texts used by the keyword generator and the fallbacks

pub const TASK_FALLBACK: [&str; 3] = [
    "Review your current tasks",
    "Plan tomorrow's priorities",
    "Take a short break",
];

pub const HABIT_FALLBACK: [&str; 3] = [
    "Drink more water throughout the day",
    "Take short walks after periods of sitting",
    "Practice mindfulness for 5 minutes daily",
];

pub const FOCUS_TIP_FALLBACK: &str = "Try the Pomodoro Technique: 25 minutes of focused work followed by a \
     5-minute break. It works with your natural attention cycles.";

pub const GENERATE_FALLBACK: &str =
    "I encountered an error while processing your request. Please try again.";

pub const INSIGHT_FALLBACK: &str = "Your task completion rate is showing good progress. Focus on \
     maintaining consistency and completing your highest priority tasks first.";

pub const TASK_IDEAS: [&str; 5] = [
    "Complete the weekly progress report with detailed metrics",
    "Schedule a focused brainstorming session for the upcoming project",
    "Review and prioritize backlog items for the next sprint",
    "Update documentation with recent changes and improvements",
    "Prepare agenda for the team sync meeting",
];

pub const HABIT_IDEAS: [&str; 5] = [
    "Drink water every hour to stay hydrated and maintain energy levels",
    "Take a 5-minute walk after each hour of focused work to improve circulation",
    "Practice mindfulness for 10 minutes daily to reduce stress and improve focus",
    "Set aside 20 minutes for planning at the start of each day",
    "Review your accomplishments at the end of each day",
];

pub const FOCUS_TIPS: [&str; 6] = [
    "Try the Pomodoro Technique: 25 minutes of focused work followed by a 5-minute break.",
    "Use the two-minute rule: if a task takes less than two minutes, do it now instead of scheduling it.",
    "Sort tasks by urgency and importance and start with what is both urgent and important.",
    "Block out one to four hours of deep work on your most important project with no distractions.",
    "Timebox tasks in your calendar and treat those blocks as appointments with yourself.",
    "Group similar tasks together to cut down on context switching.",
];

pub const ANALYSIS_BOTH_STRONG: &str = "Excellent progress! You're demonstrating strong consistency in \
     both task completion and habit maintenance. Consider increasing task complexity or adding more \
     challenging habits to keep growing.";

pub const ANALYSIS_TASKS_STRONG: &str = "Good work on task completion! Your focus on getting things done \
     is paying off. Try giving more attention to habit consistency, which supports productivity in the \
     long term.";

pub const ANALYSIS_HABITS_STRONG: &str = "Your habit consistency is impressive! Try breaking tasks into \
     smaller pieces to raise your task completion rate as well.";

pub const ANALYSIS_BOTH_WEAK: &str = "You're making progress, but there's room for improvement. Focus on \
     your highest-priority tasks first and pick one or two key habits to build consistency. Small, \
     consistent steps lead to significant results over time.";

pub const ANALYSIS_NO_METRICS: &str = "You're making good progress! Focus on completing your most \
     important tasks first and keep up your habits. Take regular breaks to prevent burnout.";

pub const GROCERY_BASIC: &str = "# Grocery List

## Fresh Produce
- Apples
- Bananas
- Spinach
- Tomatoes
- Carrots
- Onions

## Dairy & Refrigerated
- Milk
- Eggs
- Butter
- Cheese
- Yogurt

## Pantry Staples
- Bread
- Rice
- Pasta
- Olive oil
- Coffee";

pub const GROCERY_HEALTHY: &str = "# Healthy Grocery List

## Fresh Produce
- Leafy greens (spinach, kale, arugula) (high priority)
- Bell peppers
- Broccoli and cauliflower
- Avocados
- Sweet potatoes
- Berries

## Proteins
- Chicken breast
- Wild-caught salmon
- Eggs
- Greek yogurt

## Grains & Legumes
- Quinoa
- Brown rice
- Oats
- Lentils
- Chickpeas";

pub const GROCERY_VEGAN: &str = "# Vegan Grocery List

## Fresh Produce
- Leafy greens (spinach, kale, swiss chard) (high priority)
- Bell peppers and zucchini
- Mushrooms
- Sweet potatoes
- Berries and bananas

## Plant Proteins
- Tofu
- Tempeh
- Lentils
- Black beans
- Chickpeas

## Non-Dairy Products
- Oat milk
- Coconut yogurt";

pub const GROCERY_KETO: &str = "# Keto Grocery List

## Proteins
- Grass-fed beef (high priority)
- Chicken thighs
- Salmon
- Eggs

## Low-Carb Vegetables
- Leafy greens
- Broccoli
- Cauliflower
- Zucchini
- Asparagus

## Healthy Fats
- Avocados
- Butter
- Olive oil";

pub const GROCERY_GLUTEN_FREE: &str = "# Gluten-Free Grocery List

## Proteins
- Chicken
- Fish and seafood
- Eggs
- Beans and lentils

## Gluten-Free Grains & Starches
- Rice
- Quinoa
- Buckwheat
- Potatoes
- Certified gluten-free oats

## Bread & Baking
- Gluten-free bread (high priority)
- Gluten-free pasta
- Almond flour";

pub const MOVING_CHECKLIST: &str = "# Moving Checklist

## 1-2 Months Before Moving
- Research and hire a moving company (high priority)
- Create a moving budget
- Declutter and decide what to keep, donate, or sell
- Start collecting boxes

## 2-3 Weeks Before Moving
- Start packing non-essential items (medium priority)
- Notify important parties of your address change
- Schedule utility connection at the new home (high priority)

## 1 Week Before Moving
- Confirm details with the moving company (high priority)
- Pack a first-night box with essentials
- Clean your current home

## Moving Day
- Do a final walkthrough of your old home (high priority)
- Take meter readings at both properties
- Hand over keys";

pub const WEBSITE_PLAN: &str = "# Website Launch Project Plan

## Planning Phase
- Define website purpose and goals (high priority)
- Identify target audience
- Create a project timeline with milestones (due: this week)
- Research competitors' websites

## Design Phase
- Create site map and user flow diagrams
- Design wireframes for key pages (medium priority)
- Create mockups for desktop and mobile

## Development Phase
- Develop responsive templates
- Implement core functionality
- Integrate the CMS

## Testing Phase
- Cross-browser testing
- Check for broken links
- Test all forms";

pub const MEAL_PLAN: &str = "# Weekly Meal Plan

## Monday
- Breakfast: Overnight oats with berries
- Lunch: Quinoa salad with roasted vegetables
- Dinner: Baked salmon with asparagus

## Tuesday
- Breakfast: Avocado toast with poached eggs
- Lunch: Lentil soup
- Dinner: Grilled chicken with Brussels sprouts

## Wednesday
- Breakfast: Green smoothie
- Lunch: Hummus and vegetable wrap
- Dinner: Turkey meatballs with zucchini noodles";

pub const WORKOUT_PLAN: &str = "# Beginner Workout Plan

## Monday - Full Body
- Bodyweight squats: 3 sets of 10 reps
- Push-ups: 3 sets of 8 reps
- Plank: 3 sets of 20 seconds

## Tuesday - Cardio
- Brisk walking: 30 minutes
- Stretching: 10 minutes

## Wednesday - Rest
- Light stretching or yoga

## Thursday - Full Body
- Glute bridges: 3 sets of 12 reps
- Rows: 3 sets of 10 reps
- Wall sits: 3 sets of 20 seconds";

pub const TRAVEL_CHECKLIST: &str = "# Travel Packing Checklist

## Essential Documents
- Passport/ID (high priority)
- Tickets and boarding passes
- Hotel reservations
- Travel insurance

## Clothing
- Underwear and socks
- Tops and pants
- Jacket for the weather
- Comfortable walking shoes

## Toiletries
- Toothbrush and toothpaste
- Sunscreen
- Prescription medications

## Electronics
- Phone and charger (high priority)
- Power bank
- Travel adapter";

pub const READING_LIST: &str = "# Personal Development Reading List

## Self-Improvement
- \"Atomic Habits\" by James Clear (high priority)
- \"Mindset\" by Carol Dweck
- \"Deep Work\" by Cal Newport

## Career Development
- \"Range\" by David Epstein
- \"Never Split the Difference\" by Chris Voss

## Financial Literacy
- \"The Psychology of Money\" by Morgan Housel (high priority)
- \"The Simple Path to Wealth\" by J.L. Collins";
